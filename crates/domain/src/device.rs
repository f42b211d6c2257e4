//! Device — a controllable smart socket found on the local network.
//!
//! A device is identified by its hardware (MAC) address; the network address
//! may change between discovery runs (DHCP) and is refreshed on every sighting.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use macaddr::MacAddr6;
use serde::Deserialize;

use crate::error::ValidationError;

/// A 48-bit hardware address, the unique key of a [`Device`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct MacAddress(MacAddr6);

impl MacAddress {
    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        let [a, b, c, d, e, f] = octets;
        Self(MacAddr6::new(a, b, c, d, e, f))
    }

    #[must_use]
    pub fn octets(self) -> [u8; 6] {
        self.0.into_array()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.octets();
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Accepts `AC:CF:23:24:19:C0`, `ac-cf-23-24-19-c0` and `accf.2324.19c0`.
impl FromStr for MacAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<MacAddr6>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidMac(s.to_string()))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Last known power state of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
    #[default]
    Unknown,
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// A discovered smart socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub mac: MacAddress,
    pub address: IpAddr,
    pub name: Option<String>,
    /// Power state the socket reported when it was last seen.
    pub power: PowerState,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Human-readable label: the name when known, the MAC otherwise.
    #[must_use]
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.mac.to_string())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    mac: Option<MacAddress>,
    address: Option<IpAddr>,
    name: Option<String>,
    power: PowerState,
}

impl DeviceBuilder {
    #[must_use]
    pub fn mac(mut self, mac: MacAddress) -> Self {
        self.mac = Some(mac);
        self
    }

    #[must_use]
    pub fn address(mut self, address: IpAddr) -> Self {
        self.address = Some(address);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn power(mut self, power: PowerState) -> Self {
        self.power = power;
        self
    }

    /// Consume the builder and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMac`] if no MAC address was given.
    /// A missing network address defaults to the unspecified address.
    pub fn build(self) -> Result<Device, ValidationError> {
        let mac = self
            .mac
            .ok_or_else(|| ValidationError::InvalidMac(String::new()))?;
        Ok(Device {
            mac,
            address: self
                .address
                .unwrap_or(IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)),
            name: self.name.filter(|name| !name.trim().is_empty()),
            power: self.power,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    const MAC: MacAddress = MacAddress::new([0xAC, 0xCF, 0x23, 0x24, 0x19, 0xC0]);

    #[test]
    fn should_format_mac_as_uppercase_colon_separated() {
        assert_eq!(MAC.to_string(), "AC:CF:23:24:19:C0");
    }

    #[test]
    fn should_parse_mac_with_any_separator_and_case() {
        assert_eq!("AC:CF:23:24:19:C0".parse::<MacAddress>().unwrap(), MAC);
        assert_eq!("ac-cf-23-24-19-c0".parse::<MacAddress>().unwrap(), MAC);
        assert_eq!(" accf.2324.19c0 ".parse::<MacAddress>().unwrap(), MAC);
    }

    #[test]
    fn should_reject_malformed_mac() {
        for input in ["", "AC:CF:23:24:19", "AC:CF:23:24:19:C0:00", "ZZ:CF:23:24:19:C0"] {
            assert!(
                matches!(input.parse::<MacAddress>(), Err(ValidationError::InvalidMac(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn should_reject_misplaced_separators() {
        for input in [
            "ACC:F23:2419:C0",
            "A-C-C-F-2-3-2-4-1-9-C-0",
            ":::accf232419c0---",
        ] {
            assert!(
                matches!(input.parse::<MacAddress>(), Err(ValidationError::InvalidMac(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn should_deserialize_mac_from_string() {
        let parsed: MacAddress = serde_json::from_str("\"ac:cf:23:24:19:c0\"").unwrap();
        assert_eq!(parsed, MAC);
    }

    #[test]
    fn should_convert_bool_to_power_state() {
        assert_eq!(PowerState::from(true), PowerState::On);
        assert_eq!(PowerState::from(false), PowerState::Off);
        assert_eq!(PowerState::default(), PowerState::Unknown);
    }

    #[test]
    fn should_build_device_with_defaults() {
        let device = Device::builder().mac(MAC).build().unwrap();
        assert_eq!(device.mac, MAC);
        assert_eq!(device.address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(device.power, PowerState::Unknown);
        assert!(device.name.is_none());
    }

    #[test]
    fn should_require_mac_when_building() {
        assert!(Device::builder().build().is_err());
    }

    #[test]
    fn should_drop_blank_name() {
        let device = Device::builder().mac(MAC).name("  ").build().unwrap();
        assert!(device.name.is_none());
        assert_eq!(device.label(), "AC:CF:23:24:19:C0");
    }

    #[test]
    fn should_label_with_name_when_known() {
        let device = Device::builder()
            .mac(MAC)
            .address(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)))
            .name("Humidifier")
            .power(PowerState::Off)
            .build()
            .unwrap();
        assert_eq!(device.label(), "Humidifier");
    }
}
