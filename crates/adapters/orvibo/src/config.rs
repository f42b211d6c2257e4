//! Orvibo adapter configuration.

use std::net::{Ipv4Addr, SocketAddr};

use serde::Deserialize;

use crate::packet::PORT;

/// Configuration for the Orvibo transport and socket controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrviboConfig {
    /// Local address the discovery transport binds to. Sockets reply to
    /// port 10000, so the port should stay at 10000 outside of tests.
    pub bind: SocketAddr,
    /// Destination of the discovery broadcast.
    pub broadcast: SocketAddr,
}

impl Default for OrviboConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, PORT)),
            broadcast: SocketAddr::from((Ipv4Addr::BROADCAST, PORT)),
        }
    }
}
