//! Simulated room shared by the virtual sensor, sockets and transport.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Mutex, MutexGuard, PoisonError};

use pihum_app::ports::RawReading;
use pihum_domain::device::{Device, MacAddress, PowerState};

use crate::config::VirtualConfig;
use crate::error::VirtualError;

struct SimulatedSocket {
    name: Option<String>,
    power: PowerState,
}

struct RoomState {
    humidity: i32,
    temperature: i32,
    drift: i32,
    failing_reads: u32,
    sockets: BTreeMap<MacAddress, SimulatedSocket>,
}

/// Humidity rises while every socket is off and falls while one is on.
pub(crate) struct Room {
    state: Mutex<RoomState>,
}

impl Room {
    pub(crate) fn new(config: &VirtualConfig) -> Self {
        let sockets = config
            .sockets
            .iter()
            .map(|socket| {
                (
                    socket.mac,
                    SimulatedSocket {
                        name: socket.name.clone(),
                        power: socket.power,
                    },
                )
            })
            .collect();
        Self {
            state: Mutex::new(RoomState {
                humidity: config.humidity,
                temperature: config.temperature,
                drift: config.drift,
                failing_reads: config.failing_reads,
                sockets,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RoomState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take a reading, then let the room drift.
    pub(crate) fn read(&self) -> Result<RawReading, VirtualError> {
        let mut state = self.lock();
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(VirtualError::SensorGlitch);
        }

        let reading = RawReading {
            temperature: state.temperature,
            humidity: state.humidity,
        };
        let running = state.sockets.values().any(|s| s.power == PowerState::On);
        let delta = if running { -state.drift } else { state.drift };
        state.humidity = (state.humidity + delta).clamp(0, 100);
        Ok(reading)
    }

    pub(crate) fn set_power(&self, mac: MacAddress, power: PowerState) -> Result<(), VirtualError> {
        let mut state = self.lock();
        let socket = state
            .sockets
            .get_mut(&mac)
            .ok_or(VirtualError::UnknownSocket(mac))?;
        socket.power = power;
        Ok(())
    }

    /// Every simulated socket as it would answer a discovery broadcast.
    pub(crate) fn devices(&self) -> Vec<Device> {
        self.lock()
            .sockets
            .iter()
            .map(|(mac, socket)| Device {
                mac: *mac,
                address: IpAddr::V4(Ipv4Addr::LOCALHOST),
                name: socket.name.clone(),
                power: socket.power,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VirtualSocketConfig;

    const MAC: MacAddress = MacAddress::new([0xAC, 0xCF, 0x23, 0x00, 0x00, 0x01]);

    fn room(humidity: i32, failing_reads: u32) -> Room {
        Room::new(&VirtualConfig {
            humidity,
            failing_reads,
            drift: 10,
            sockets: vec![VirtualSocketConfig {
                mac: MAC,
                name: None,
                power: PowerState::Off,
            }],
            ..VirtualConfig::default()
        })
    }

    #[test]
    fn should_rise_while_sockets_are_off() {
        let room = room(50, 0);
        assert_eq!(room.read().unwrap().humidity, 50);
        assert_eq!(room.read().unwrap().humidity, 60);
    }

    #[test]
    fn should_fall_while_a_socket_is_on() {
        let room = room(50, 0);
        room.set_power(MAC, PowerState::On).unwrap();
        room.read().unwrap();
        assert_eq!(room.read().unwrap().humidity, 40);
    }

    #[test]
    fn should_clamp_humidity() {
        let room = room(95, 0);
        room.read().unwrap();
        assert_eq!(room.read().unwrap().humidity, 100);
    }

    #[test]
    fn should_fail_configured_number_of_reads() {
        let room = room(50, 2);
        assert!(room.read().is_err());
        assert!(room.read().is_err());
        assert!(room.read().is_ok());
    }

    #[test]
    fn should_reject_unknown_socket() {
        let room = room(50, 0);
        let other = MacAddress::new([0; 6]);
        assert!(matches!(
            room.set_power(other, PowerState::On),
            Err(VirtualError::UnknownSocket(mac)) if mac == other
        ));
        assert_eq!(room.devices()[0].power, PowerState::Off);
    }
}
