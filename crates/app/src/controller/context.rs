//! Controller context — everything the state machine knows between steps.

use std::net::IpAddr;

use pihum_domain::device::{Device, MacAddress, PowerState};
use pihum_domain::measurement::Measurement;
use pihum_domain::registry::DeviceRegistry;
use pihum_domain::state::State;
use pihum_domain::threshold::ThresholdConfig;

/// Long-lived aggregate owned by the [`Controller`](super::Controller).
///
/// Read access is public; only the controller mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerContext {
    pub(super) state: State,
    pub(super) thresholds: ThresholdConfig,
    /// MAC of the socket to control, even while its address is unknown.
    pub(super) socket_mac: Option<MacAddress>,
    pub(super) selected: Option<Device>,
    pub(super) socket_power: PowerState,
    pub(super) last_measurement: Option<Measurement>,
    pub(super) registry: DeviceRegistry,
}

impl ControllerContext {
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn thresholds(&self) -> ThresholdConfig {
        self.thresholds
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Device> {
        self.selected.as_ref()
    }

    /// Power state of the selected socket: what it last reported during
    /// discovery, or what it was last commanded to.
    #[must_use]
    pub fn socket_power(&self) -> PowerState {
        self.socket_power
    }

    #[must_use]
    pub fn last_measurement(&self) -> Option<&Measurement> {
        self.last_measurement.as_ref()
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Point the controller at the socket with `mac`.
    ///
    /// The device is taken from the current registry when present, built
    /// from `address` otherwise. Without either, the choice is remembered and
    /// resolved by the next discovery run that sees the socket.
    pub(super) fn select_socket(&mut self, mac: MacAddress, address: Option<IpAddr>) {
        self.socket_mac = Some(mac);
        let device = self.registry.get(&mac).cloned().or_else(|| {
            address.and_then(|address| Device::builder().mac(mac).address(address).build().ok())
        });
        self.socket_power = device.as_ref().map_or(PowerState::Unknown, |d| d.power);
        self.selected = device;
    }

    /// Replace the registry with a fresh discovery result, refreshing the
    /// selected socket when it answered.
    pub(super) fn store_registry(&mut self, registry: DeviceRegistry) {
        if let Some(device) = self.socket_mac.and_then(|mac| registry.get(&mac)) {
            if device.power != PowerState::Unknown {
                self.socket_power = device.power;
            }
            self.selected = Some(device.clone());
        }
        self.registry = registry;
    }
}
