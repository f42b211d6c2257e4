//! Humidity thresholds and the hysteresis decision.
//!
//! ```text
//!   0%            low                 high            100%
//!   |--- off -----|==== no action ====|----- on -------|
//! ```
//!
//! Above `high` the socket is switched on unless it already is; below `low`
//! it is switched off only when it is known to be on. Inside the band nothing
//! happens, which keeps the socket from chattering around a single set point.

use crate::device::PowerState;
use crate::error::ValidationError;

/// Humidity band, `low < high` enforced on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdConfig {
    low: u8,
    high: u8,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self { low: 35, high: 60 }
    }
}

/// What the controller should do with the socket after a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerDecision {
    TurnOn,
    TurnOff,
    NoAction,
}

impl PowerDecision {
    /// The power command to send, if any.
    #[must_use]
    pub fn command(self) -> Option<bool> {
        match self {
            Self::TurnOn => Some(true),
            Self::TurnOff => Some(false),
            Self::NoAction => None,
        }
    }
}

impl ThresholdConfig {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvertedThresholds`] unless `low < high`,
    /// and [`ValidationError::HumidityOutOfRange`] when `high` exceeds 100.
    pub fn new(low: u8, high: u8) -> Result<Self, ValidationError> {
        if low >= high {
            return Err(ValidationError::InvertedThresholds { low, high });
        }
        if high > 100 {
            return Err(ValidationError::HumidityOutOfRange(i32::from(high)));
        }
        Ok(Self { low, high })
    }

    #[must_use]
    pub fn low(&self) -> u8 {
        self.low
    }

    #[must_use]
    pub fn high(&self) -> u8 {
        self.high
    }

    /// Decide on a power action for `humidity` given the socket's last known
    /// state. Pure: identical inputs always give the same answer.
    #[must_use]
    pub fn decide(&self, humidity: u8, socket: PowerState) -> PowerDecision {
        if humidity > self.high && socket != PowerState::On {
            PowerDecision::TurnOn
        } else if humidity < self.low && socket == PowerState::On {
            PowerDecision::TurnOff
        } else {
            PowerDecision::NoAction
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> ThresholdConfig {
        ThresholdConfig::new(35, 60).unwrap()
    }

    #[test]
    fn should_default_to_35_60() {
        assert_eq!(ThresholdConfig::default(), band());
    }

    #[test]
    fn should_reject_inverted_or_equal_thresholds() {
        assert_eq!(
            ThresholdConfig::new(60, 35),
            Err(ValidationError::InvertedThresholds { low: 60, high: 35 })
        );
        assert!(ThresholdConfig::new(50, 50).is_err());
    }

    #[test]
    fn should_reject_high_above_hundred() {
        assert_eq!(
            ThresholdConfig::new(35, 120),
            Err(ValidationError::HumidityOutOfRange(120))
        );
    }

    #[test]
    fn should_turn_on_above_high_when_off_or_unknown() {
        assert_eq!(band().decide(65, PowerState::Off), PowerDecision::TurnOn);
        assert_eq!(band().decide(65, PowerState::Unknown), PowerDecision::TurnOn);
    }

    #[test]
    fn should_not_repeat_on_when_already_on() {
        assert_eq!(band().decide(65, PowerState::On), PowerDecision::NoAction);
    }

    #[test]
    fn should_turn_off_below_low_when_on() {
        assert_eq!(band().decide(30, PowerState::On), PowerDecision::TurnOff);
    }

    #[test]
    fn should_not_turn_off_below_low_unless_known_on() {
        assert_eq!(band().decide(30, PowerState::Off), PowerDecision::NoAction);
        assert_eq!(band().decide(30, PowerState::Unknown), PowerDecision::NoAction);
    }

    #[test]
    fn should_do_nothing_inside_band_regardless_of_state() {
        for state in [PowerState::On, PowerState::Off, PowerState::Unknown] {
            for _ in 0..3 {
                assert_eq!(band().decide(45, state), PowerDecision::NoAction);
            }
        }
    }

    #[test]
    fn should_treat_band_edges_as_inside() {
        assert_eq!(band().decide(60, PowerState::Off), PowerDecision::NoAction);
        assert_eq!(band().decide(35, PowerState::On), PowerDecision::NoAction);
    }

    #[test]
    fn should_map_decision_to_command() {
        assert_eq!(PowerDecision::TurnOn.command(), Some(true));
        assert_eq!(PowerDecision::TurnOff.command(), Some(false));
        assert_eq!(PowerDecision::NoAction.command(), None);
    }
}
