//! Simulated discovery transport.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use pihum_app::ports::{Transport, TransportEvent};
use pihum_domain::error::TransportError;
use tokio::time::Instant;

use crate::error::VirtualError;
use crate::room::Room;

/// [`Transport`] on which every simulated socket answers a broadcast after a
/// fixed delay.
pub struct VirtualTransport {
    room: Arc<Room>,
    delay: Duration,
    open: bool,
    pending: VecDeque<(Instant, TransportEvent)>,
}

impl VirtualTransport {
    pub(crate) fn new(room: Arc<Room>, delay: Duration) -> Self {
        Self {
            room,
            delay,
            open: false,
            pending: VecDeque::new(),
        }
    }

    /// A new, closed transport announcing the same room.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self::new(Arc::clone(&self.room), self.delay)
    }
}

impl Transport for VirtualTransport {
    async fn prepare(&mut self) -> Result<(), TransportError> {
        self.open = true;
        Ok(())
    }

    async fn broadcast_discover(&mut self) -> Result<(), TransportError> {
        if !self.open {
            return Err(VirtualError::NotOpen.into());
        }
        let at = Instant::now() + self.delay;
        self.pending.extend(
            self.room
                .devices()
                .into_iter()
                .map(|device| (at, TransportEvent::DeviceFound(device))),
        );
        Ok(())
    }

    async fn next_event(&mut self) -> Result<TransportEvent, TransportError> {
        if !self.open {
            return Err(VirtualError::NotOpen.into());
        }
        let Some(at) = self.pending.front().map(|(at, _)| *at) else {
            // Nothing will ever arrive; wait to be cancelled.
            return std::future::pending().await;
        };
        tokio::time::sleep_until(at).await;
        self.pending
            .pop_front()
            .map(|(_, event)| event)
            .ok_or_else(|| VirtualError::NotOpen.into())
    }

    async fn close(&mut self) {
        self.open = false;
        self.pending.clear();
    }
}
