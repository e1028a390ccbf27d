//! Output drivers and the button edge latch.

pub mod button;
pub mod pump;
pub mod status_led;
