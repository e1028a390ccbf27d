//! GPIO assignments for the LevelGuard node boards (ESP32-C3).
//!
//! Single source of truth: both firmware images take their pins from
//! here rather than hard-coding numbers. Both boards use the same PCB, so
//! the numbers do not overlap between roles.

// ---------------------------------------------------------------------------
// Control node
// ---------------------------------------------------------------------------

/// Cycle button, active-low with internal pull-up, falling-edge interrupt.
pub const BUTTON_GPIO: i32 = 9;
/// Pump relay driver, HIGH = running.
pub const PUMP_GPIO: i32 = 4;
/// Indicator LED, HIGH = lit.
pub const INDICATOR_GPIO: i32 = 5;

/// Bit of `BUTTON_GPIO` in the port interrupt-pending mask.
pub const BUTTON_MASK: u32 = 1 << BUTTON_GPIO;

// ---------------------------------------------------------------------------
// Sense node
// ---------------------------------------------------------------------------

/// Float switch to ground, internal pull-up. LOW = level OK.
pub const LEVEL_SWITCH_GPIO: i32 = 6;

