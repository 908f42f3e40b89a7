//! Application core: pure control logic, zero I/O.
//!
//! This module holds the control service that owns the latest sensor
//! reading and the hysteresis state.  All interaction with the broker, the
//! archive and the log happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without a network.

pub mod events;
pub mod ports;
pub mod service;
