//! Application core — pure domain logic, zero I/O.
//!
//! One service per node role: [`control::ControlService`] and
//! [`sense::SenseService`]. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod control;
pub mod events;
pub mod ports;
pub mod sense;
