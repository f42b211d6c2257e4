//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod discovery;
pub mod operator;
pub mod sensor;
pub mod socket;
pub mod transport;

pub use discovery::DeviceDiscovery;
pub use operator::{InputError, Operator};
pub use sensor::{HumiditySensor, RawReading, SensorReader};
pub use socket::SocketController;
pub use transport::{Transport, TransportEvent};
