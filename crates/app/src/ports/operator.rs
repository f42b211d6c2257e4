//! Operator port — the text command surface.

use std::future::Future;

use pihum_domain::error::BoxError;

/// Why no command line could be read.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The input stream is closed; nothing more will ever arrive.
    #[error("end of input")]
    EndOfInput,

    /// A read failed but the stream is still usable.
    #[error("failed to read command")]
    Transient(#[source] BoxError),
}

/// Line-oriented operator console.
pub trait Operator {
    /// Wait for the next command line.
    fn next_command(&mut self) -> impl Future<Output = Result<String, InputError>> + Send;

    /// Show a line to the operator. Output failures are the adapter's to
    /// log; they never reach the controller.
    fn say(&mut self, message: &str) -> impl Future<Output = ()> + Send;
}
