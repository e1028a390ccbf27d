//! Hardware adapters — bridge the pin drivers to the domain port traits.
//!
//! Generic over `embedded-hal` pins, so the same adapters run against
//! `esp-idf-hal` `PinDriver`s on target and recording fakes in tests.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{ActuatorPort, LevelSensorPort};
use crate::drivers::pump::Pump;
use crate::drivers::status_led::Indicator;
use crate::error::{ActuatorError, SensorError};
use crate::protocol::LevelStatus;
use crate::sensors::water_level::LevelSwitch;

/// Control node outputs: pump and indicator.
pub struct ControlHardware<PumpPin: OutputPin, LedPin: OutputPin> {
    pump: Pump<PumpPin>,
    indicator: Indicator<LedPin>,
}

impl<PumpPin: OutputPin, LedPin: OutputPin> ControlHardware<PumpPin, LedPin> {
    pub fn new(pump: Pump<PumpPin>, indicator: Indicator<LedPin>) -> Self {
        Self { pump, indicator }
    }

    pub fn pump(&self) -> &Pump<PumpPin> {
        &self.pump
    }

    pub fn indicator(&self) -> &Indicator<LedPin> {
        &self.indicator
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<PumpPin: OutputPin, LedPin: OutputPin> ActuatorPort for ControlHardware<PumpPin, LedPin> {
    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.pump.set(on)
    }

    fn set_indicator(&mut self, lit: bool) -> Result<(), ActuatorError> {
        self.indicator.set(lit)
    }

    fn all_off(&mut self) {
        if let Err(e) = self.pump.off() {
            warn!("all_off: {}", e);
        }
        if let Err(e) = self.indicator.off() {
            warn!("all_off: {}", e);
        }
    }
}

/// Sense node input: the level switch.
pub struct SenseHardware<SwitchPin: InputPin> {
    switch: LevelSwitch<SwitchPin>,
}

impl<SwitchPin: InputPin> SenseHardware<SwitchPin> {
    pub fn new(switch: LevelSwitch<SwitchPin>) -> Self {
        Self { switch }
    }
}

// ── LevelSensorPort implementation ────────────────────────────

impl<SwitchPin: InputPin> LevelSensorPort for SenseHardware<SwitchPin> {
    fn read_level(&mut self) -> Result<LevelStatus, SensorError> {
        self.switch.read()
    }
}
