//! LevelGuard firmware library.
//!
//! Shared core of the two node images: the packet codec, both role state
//! machines, and their services. Everything here builds and tests on the
//! host; ESP-IDF-specific code is guarded by the `espidf` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod events;
pub mod fsm;
pub mod pins;
pub mod protocol;
pub mod radio;
pub mod sensors;

mod error;

pub use error::{ActuatorError, DecodeError, Error, RadioError, Result, SensorError};
