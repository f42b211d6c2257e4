//! Socket port — switching the controlled socket.

use std::future::Future;

use pihum_domain::device::Device;
use pihum_domain::error::SocketError;

/// Sends power commands to a smart socket.
///
/// Fire-and-forget: `Ok` means the command left the host, not that the
/// socket acted on it.
pub trait SocketController {
    fn set_power(
        &self,
        device: &Device,
        on: bool,
    ) -> impl Future<Output = Result<(), SocketError>> + Send;
}
