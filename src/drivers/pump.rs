//! Pump output driver.
//!
//! A single digital output switches the pump (via relay or MOSFET).
//! High = running.
//!
//! ## Safety contract
//!
//! The pump must never run unless the Sense node has just confirmed the
//! level. That is enforced by the control state machine; this driver is
//! a dumb actuator that always leaves the pin low when dropped.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Off,
    On,
}

pub struct Pump<P: OutputPin> {
    pin: P,
    state: PumpState,
}

impl<P: OutputPin> Pump<P> {
    /// Takes ownership of the pin and drives it low.
    pub fn new(pin: P) -> Result<Self, ActuatorError> {
        let mut pump = Self {
            pin,
            state: PumpState::Off,
        };
        pump.off()?;
        Ok(pump)
    }

    pub fn on(&mut self) -> Result<(), ActuatorError> {
        self.pin.set_high().map_err(|_| ActuatorError::PumpWriteFailed)?;
        self.state = PumpState::On;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), ActuatorError> {
        // Record Off even if the write fails so a retry is attempted next tick.
        self.state = PumpState::Off;
        self.pin.set_low().map_err(|_| ActuatorError::PumpWriteFailed)
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        if on { self.on() } else { self.off() }
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PumpState::On
    }
}

impl<P: OutputPin> Drop for Pump<P> {
    fn drop(&mut self) {
        if self.pin.set_low().is_err() {
            warn!("pump: failed to drive output low on drop");
        }
    }
}
