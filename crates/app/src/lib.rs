//! # pihum-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Transport` — open, broadcast, receive and close the discovery channel
//!   - `HumiditySensor` — one physical temperature/humidity read
//!   - `SocketController` — switch a socket on or off
//!   - `Operator` — read commands, print replies
//! - Define the ports the controller depends on:
//!   - `DeviceDiscovery` — time-bounded search for sockets
//!   - `SensorReader` — read with a fixed retry budget
//! - Provide the **use-cases** implementing them (`DiscoveryService`,
//!   `RetryingSensorReader`)
//! - Run the **controller** state machine
//!
//! ## Dependency rule
//! Depends on `pihum-domain` only (plus `tokio` for tasks, channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod controller;
pub mod ports;
pub mod services;
