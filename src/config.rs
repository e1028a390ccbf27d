//! Node configuration parameters
//!
//! All tunable timing for both node roles. Fixed at boot; there is no
//! runtime reconfiguration and nothing is persisted.
//!
//! Defaults reproduce the legacy firmware's busy-wait cycle counts at the
//! nominal 1 MHz clock (10,000 / 1,000,000 / 450,000 cycles).

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How long the Control node waits for a reply before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyTimeout {
    /// Give up after this many milliseconds; the cycle ends without actuation.
    Bounded { ms: u32 },
    /// Wait forever. A lost reply wedges the node until reset.
    Unbounded,
}

impl ReplyTimeout {
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            Self::Bounded { ms } => Some(Duration::from_millis(ms as u64)),
            Self::Unbounded => None,
        }
    }
}

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Control node ---
    /// Button settle time after a falling edge (milliseconds)
    pub debounce_ms: u32,
    /// Pump on-time for a confirmed level (milliseconds)
    pub pump_on_ms: u32,
    /// Reply wait policy
    pub reply_timeout: ReplyTimeout,
    /// Light the indicator when a valid reply arrives
    pub indicate_valid_reply: bool,

    // --- Sense node ---
    /// Dead time after each reply during which new queries are dropped (milliseconds)
    pub settle_ms: u32,

    // --- Diagnostics ---
    /// Link counter log interval (seconds, 0 = never)
    pub stats_log_interval_secs: u32,
}

impl NodeConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms as u64)
    }

    pub fn pump_on_time(&self) -> Duration {
        Duration::from_millis(self.pump_on_ms as u64)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms as u64)
    }

    /// Reject values that would make a role state machine misbehave.
    pub fn validate(&self) -> Result<(), Error> {
        if self.debounce_ms == 0 {
            return Err(Error::Config("debounce_ms must be non-zero"));
        }
        if self.pump_on_ms == 0 {
            return Err(Error::Config("pump_on_ms must be non-zero"));
        }
        if self.settle_ms == 0 {
            return Err(Error::Config("settle_ms must be non-zero"));
        }
        if self.reply_timeout == (ReplyTimeout::Bounded { ms: 0 }) {
            return Err(Error::Config("bounded reply timeout must be non-zero"));
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            // Control
            debounce_ms: 10,
            pump_on_ms: 1_000,
            reply_timeout: ReplyTimeout::Bounded { ms: 2_000 },
            indicate_valid_reply: true,

            // Sense
            settle_ms: 450,

            // Diagnostics
            stats_log_interval_secs: 60,
        }
    }
}
