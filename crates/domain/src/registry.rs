//! Device registry — the deduplicated result of one discovery run.

use std::collections::HashMap;
use std::collections::hash_map;

use crate::device::{Device, MacAddress};

/// Devices keyed by MAC address. A later sighting of the same MAC replaces
/// the earlier one, so the registry always holds the last-seen [`Device`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRegistry {
    devices: HashMap<MacAddress, Device>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sighting, returning the device it replaced (if any).
    pub fn insert(&mut self, device: Device) -> Option<Device> {
        self.devices.insert(device.mac, device)
    }

    #[must_use]
    pub fn get(&self, mac: &MacAddress) -> Option<&Device> {
        self.devices.get(mac)
    }

    #[must_use]
    pub fn contains(&self, mac: &MacAddress) -> bool {
        self.devices.contains_key(mac)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterate over the devices in unspecified order.
    pub fn devices(&self) -> hash_map::Values<'_, MacAddress, Device> {
        self.devices.values()
    }
}

impl FromIterator<Device> for DeviceRegistry {
    fn from_iter<I: IntoIterator<Item = Device>>(iter: I) -> Self {
        let mut registry = Self::new();
        for device in iter {
            registry.insert(device);
        }
        registry
    }
}
