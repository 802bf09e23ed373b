//! Application core: pure domain logic, zero I/O.
//!
//! This module holds the talkback controller's rules: boot decision,
//! button handling, LED policy and subscription upkeep. All interaction
//! with hardware and the network happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
