//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService / SenseService (domain)
//! ```
//!
//! Driven adapters (actuators, the level switch, event sinks, the clock)
//! implement these traits. The services consume them via generics, so
//! the domain core never touches hardware directly. The radio send side
//! is [`RadioTransport`](crate::radio::RadioTransport).

use embassy_time::Instant;

use crate::error::{ActuatorError, SensorError};
use crate::protocol::LevelStatus;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the Control node outputs.
pub trait ActuatorPort {
    /// Drive the pump output.
    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Drive the indicator LED.
    fn set_indicator(&mut self, lit: bool) -> Result<(), ActuatorError>;

    /// Best-effort: every output low, errors logged and swallowed.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Level sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the Sense node's level switch.
pub trait LevelSensorPort {
    /// Sample the switch now.
    fn read_level(&mut self) -> Result<LevelStatus, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source for the main loop.
pub trait Clock {
    fn now(&self) -> Instant;
}
