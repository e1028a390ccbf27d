//! Indicator LED driver (single digital output, high = lit).

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct Indicator<P: OutputPin> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> Indicator<P> {
    pub fn new(pin: P) -> Result<Self, ActuatorError> {
        let mut led = Self { pin, lit: false };
        led.set(false)?;
        Ok(led)
    }

    pub fn set(&mut self, lit: bool) -> Result<(), ActuatorError> {
        let res = if lit {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ActuatorError::IndicatorWriteFailed)?;
        self.lit = lit;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), ActuatorError> {
        self.set(false)
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
