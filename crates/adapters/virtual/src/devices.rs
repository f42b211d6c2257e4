//! Simulated sensor and socket controller.

use std::sync::Arc;

use pihum_app::ports::{HumiditySensor, RawReading, SocketController};
use pihum_domain::device::{Device, PowerState};
use pihum_domain::error::{SensorError, SocketError};

use crate::room::Room;

/// [`HumiditySensor`] reading the simulated room.
pub struct VirtualSensor {
    room: Arc<Room>,
}

impl VirtualSensor {
    pub(crate) fn new(room: Arc<Room>) -> Self {
        Self { room }
    }
}

impl HumiditySensor for VirtualSensor {
    async fn read_raw(&mut self) -> Result<RawReading, SensorError> {
        Ok(self.room.read()?)
    }
}

/// [`SocketController`] switching simulated sockets.
pub struct VirtualSocket {
    room: Arc<Room>,
}

impl VirtualSocket {
    pub(crate) fn new(room: Arc<Room>) -> Self {
        Self { room }
    }
}

impl SocketController for VirtualSocket {
    async fn set_power(&self, device: &Device, on: bool) -> Result<(), SocketError> {
        self.room.set_power(device.mac, PowerState::from(on))?;
        tracing::info!(mac = %device.mac, on, "virtual socket switched");
        Ok(())
    }
}
