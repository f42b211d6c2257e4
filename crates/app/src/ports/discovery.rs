//! Discovery port — what the controller needs from a device search.

use std::future::Future;
use std::time::Duration;

use pihum_domain::registry::DeviceRegistry;

/// Time-bounded search for controllable sockets.
///
/// Infallible from the caller's point of view: transport problems are
/// reported by the implementation and surface as an empty registry.
pub trait DeviceDiscovery {
    fn discover(&mut self, timeout: Duration) -> impl Future<Output = DeviceRegistry> + Send;
}
