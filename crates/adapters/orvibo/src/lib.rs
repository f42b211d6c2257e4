//! # pihum-adapter-orvibo
//!
//! Orvibo S20 adapter — finds smart sockets with a UDP broadcast and
//! switches them on and off.
//!
//! ## How it works
//!
//! Discovery binds UDP port 10000 and broadcasts a `qa` packet; every socket
//! answers with its MAC and relay state. To switch a socket, a `cl`
//! subscription followed by a `dc` power command is sent to its address.
//! See [`packet`] for the wire format.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `pihum-app` and `pihum-domain`.

mod config;
mod error;
pub mod packet;
mod socket;
mod transport;

pub use config::OrviboConfig;
pub use error::{OrviboError, PacketError};
pub use socket::OrviboSocketController;
pub use transport::OrviboTransport;
