//! Discovery service — time-bounded search for smart sockets.
//!
//! One run opens the [`Transport`], broadcasts a discovery request and hands
//! the transport to a background listener task that decodes incoming
//! messages and forwards every found [`Device`] over a channel. The caller
//! collects from that channel until the timeout fires:
//!
//! ```text
//!  listener task                          discover()
//!  ─────────────                          ──────────
//!  next_event() ──DeviceFound──▶ mpsc ──▶ select! { biased;
//!  next_event() ──Other──▶ (dropped)          deadline => stop,
//!  next_event() ──Decode err──▶ (skipped)     recv     => registry.insert }
//!        ▲                                     │
//!        └──────────── stop (oneshot) ◀────────┘ after the deadline
//! ```
//!
//! The deadline branch is polled first on every iteration, so a busy network
//! can never postpone the end of the run, and nothing received after the
//! deadline reaches the returned registry.
//!
//! If the listener task panics the transport goes down with it. A service
//! built [`with_rebuild`](DiscoveryService::with_rebuild) opens a fresh one on
//! the next run; without it every later run returns an empty registry.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use pihum_domain::device::Device;
use pihum_domain::error::TransportError;
use pihum_domain::registry::DeviceRegistry;

use crate::ports::{DeviceDiscovery, Transport, TransportEvent};

/// How long a discovery run listens for answers unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const EVENT_BUFFER: usize = 32;

/// Runs discovery over a transport it owns between runs.
pub struct DiscoveryService<T> {
    transport: Option<T>,
    rebuild: Option<Box<dyn Fn() -> T + Send>>,
}

impl<T: Transport + 'static> DiscoveryService<T> {
    /// Create a new service owning `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Some(transport),
            rebuild: None,
        }
    }

    /// Replace a transport lost with a crashed listener by calling `rebuild`.
    #[must_use]
    pub fn with_rebuild(mut self, rebuild: impl Fn() -> T + Send + 'static) -> Self {
        self.rebuild = Some(Box::new(rebuild));
        self
    }

    /// Listen for sockets for exactly `timeout` and return everything found.
    ///
    /// Transport failures are logged and yield an empty registry.
    #[tracing::instrument(skip(self))]
    pub async fn run(&mut self, timeout: Duration) -> DeviceRegistry {
        let Some(mut transport) = self.transport.take().or_else(|| self.rebuilt()) else {
            tracing::error!("discovery transport was lost by an earlier run");
            return DeviceRegistry::new();
        };

        if let Err(err) = open(&mut transport).await {
            tracing::warn!(%err, cause = ?std::error::Error::source(&err), "discovery transport unavailable");
            self.transport = Some(transport);
            return DeviceRegistry::new();
        }

        tracing::info!("searching for sockets");

        let (events_tx, mut events_rx) = mpsc::channel(EVENT_BUFFER);
        let (stop_tx, stop_rx) = oneshot::channel();
        let listener = tokio::spawn(listen(transport, events_tx, stop_rx));

        let registry = collect(&mut events_rx, timeout).await;

        // Whatever is still queued arrived after the deadline.
        drop(events_rx);
        let _ = stop_tx.send(());
        match listener.await {
            Ok(transport) => self.transport = Some(transport),
            Err(err) => tracing::error!(%err, "discovery listener task failed"),
        }

        tracing::info!(count = registry.len(), "discovery complete");
        registry
    }

    fn rebuilt(&self) -> Option<T> {
        let rebuild = self.rebuild.as_ref()?;
        tracing::warn!("rebuilding discovery transport");
        Some(rebuild())
    }
}

impl<T: Transport + 'static> DeviceDiscovery for DiscoveryService<T> {
    async fn discover(&mut self, timeout: Duration) -> DeviceRegistry {
        self.run(timeout).await
    }
}

/// Prepare the transport and send the broadcast, closing it again when the
/// broadcast cannot be sent.
async fn open<T: Transport>(transport: &mut T) -> Result<(), TransportError> {
    transport.prepare().await?;
    if let Err(err) = transport.broadcast_discover().await {
        transport.close().await;
        return Err(err);
    }
    Ok(())
}

/// Drain the transport until told to stop, then close it and give it back.
async fn listen<T: Transport>(
    mut transport: T,
    events: mpsc::Sender<Device>,
    mut stop: oneshot::Receiver<()>,
) -> T {
    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            received = transport.next_event() => match received {
                Ok(TransportEvent::DeviceFound(device)) => {
                    if events.send(device).await.is_err() {
                        break;
                    }
                }
                Ok(TransportEvent::Other { kind }) => {
                    tracing::trace!(%kind, "ignoring non-discovery message");
                }
                Err(TransportError::Decode(err)) => {
                    tracing::debug!(%err, "skipping undecodable message");
                }
                Err(err) => {
                    tracing::warn!(%err, "discovery listener stopped early");
                    break;
                }
            },
        }
    }
    transport.close().await;
    transport
}

async fn collect(events: &mut mpsc::Receiver<Device>, timeout: Duration) -> DeviceRegistry {
    let mut registry = DeviceRegistry::new();
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);
    let mut listening = true;

    loop {
        tokio::select! {
            biased;
            () = &mut deadline => break,
            event = events.recv(), if listening => match event {
                Some(device) => {
                    tracing::debug!(mac = %device.mac, address = %device.address, "socket found");
                    if registry.insert(device).is_some() {
                        tracing::trace!("replaced an earlier sighting");
                    }
                }
                // The listener gave up; the run still lasts the full timeout.
                None => listening = false,
            },
        }
    }

    registry
}
