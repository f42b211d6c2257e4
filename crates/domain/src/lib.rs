//! # pihum-domain
//!
//! Pure domain model for the pihum humidity controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions
//! - Define **Devices** (controllable smart sockets keyed by MAC address)
//! - Define the **DeviceRegistry** built by each discovery run
//! - Define **Measurements** (temperature/humidity snapshots)
//! - Define **Thresholds** and the hysteresis decision
//! - Define the controller **States** and operator **Commands**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod command;
pub mod device;
pub mod measurement;
pub mod registry;
pub mod state;
pub mod threshold;
