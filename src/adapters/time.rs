//! Monotonic clock adapter.
//!
//! - **`espidf`** — wraps `esp_timer_get_time()` from the ESP-IDF
//!   high-resolution timer (microsecond precision, monotonic, ISR-safe).
//! - **host** — uses `std::time::Instant` from construction, for
//!   simulation runs.

use embassy_time::Instant;

use crate::app::ports::Clock;

pub struct SystemClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot.
    #[cfg(feature = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        uptime_us()
    }

    /// Microseconds since construction.
    #[cfg(not(feature = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Milliseconds, truncated to `u32` for ISR timestamps. Same timeline
    /// as [`Clock::now`], so the debouncer can compare the two.
    pub fn uptime_ms_u32(&self) -> u32 {
        (self.uptime_us() / 1_000) as u32
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::from_micros(self.uptime_us())
    }
}

/// Free-function form for link-time hooks that cannot hold a clock.
#[cfg(feature = "espidf")]
pub fn uptime_us() -> u64 {
    // SAFETY: plain read of the monotonic system timer, callable from ISRs.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
}
