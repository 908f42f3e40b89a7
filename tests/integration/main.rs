//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock ports.  Everything runs on the host with no broker.

mod mock_ports;
mod scheduler_tests;
mod service_tests;
