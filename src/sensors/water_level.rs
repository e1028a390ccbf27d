//! Float-switch water level input.
//!
//! The switch closes to ground when the water is at a safe level, so the
//! input reads low for "valid" and high (pull-up) otherwise. An open or
//! broken wire therefore reads as not valid.

use embedded_hal::digital::InputPin;

use crate::error::SensorError;
use crate::protocol::LevelStatus;

pub struct LevelSwitch<P: InputPin> {
    pin: P,
    last: Option<LevelStatus>,
}

impl<P: InputPin> LevelSwitch<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, last: None }
    }

    /// Sample the switch now.
    pub fn read(&mut self) -> Result<LevelStatus, SensorError> {
        let low = self.pin.is_low().map_err(|_| SensorError::GpioReadFailed)?;
        let status = if low {
            LevelStatus::Valid
        } else {
            LevelStatus::Invalid
        };
        self.last = Some(status);
        Ok(status)
    }

    /// Result of the most recent successful read.
    pub fn last(&self) -> Option<LevelStatus> {
        self.last
    }
}
