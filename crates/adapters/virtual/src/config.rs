//! Virtual backend configuration.

use pihum_domain::device::{MacAddress, PowerState};
use serde::Deserialize;

/// Configuration of the simulated room.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Relative humidity at startup, in percent.
    pub humidity: i32,
    /// Temperature, in tenths of a degree Celsius.
    pub temperature: i32,
    /// Humidity change per reading: down while any socket is on, up otherwise.
    pub drift: i32,
    /// Number of initial sensor reads that fail.
    pub failing_reads: u32,
    /// Delay before simulated sockets answer a discovery broadcast, in
    /// milliseconds.
    pub announce_delay_ms: u64,
    /// Simulated sockets on the network.
    pub sockets: Vec<VirtualSocketConfig>,
}

/// One simulated socket.
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualSocketConfig {
    pub mac: MacAddress,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_power")]
    pub power: PowerState,
}

fn default_power() -> PowerState {
    PowerState::Off
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            humidity: 65,
            temperature: 215,
            drift: 5,
            failing_reads: 0,
            announce_delay_ms: 200,
            sockets: vec![VirtualSocketConfig {
                mac: MacAddress::new([0xAC, 0xCF, 0x23, 0x00, 0x00, 0x01]),
                name: Some("Virtual Humidifier".to_string()),
                power: PowerState::Off,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = VirtualConfig::default();
        assert_eq!(config.humidity, 65);
        assert_eq!(config.temperature, 215);
        assert_eq!(config.drift, 5);
        assert_eq!(config.failing_reads, 0);
        assert_eq!(config.announce_delay_ms, 200);
        assert_eq!(config.sockets.len(), 1);
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            humidity = 80
            failing_reads = 2

            [[sockets]]
            mac = "AC:CF:23:24:19:C0"
            power = "on"

            [[sockets]]
            mac = "ac-cf-23-24-19-c1"
        "#;
        let config: VirtualConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.humidity, 80);
        assert_eq!(config.failing_reads, 2);
        assert_eq!(config.temperature, 215);
        assert_eq!(config.sockets.len(), 2);
        assert_eq!(config.sockets[0].power, PowerState::On);
        assert_eq!(config.sockets[1].power, PowerState::Off);
        assert_eq!(config.sockets[1].mac.to_string(), "AC:CF:23:24:19:C1");
    }

    #[test]
    fn should_reject_invalid_mac() {
        let toml = r#"
            [[sockets]]
            mac = "not-a-mac"
        "#;
        assert!(toml::from_str::<VirtualConfig>(toml).is_err());
    }
}
