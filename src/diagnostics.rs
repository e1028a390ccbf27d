//! Link diagnostics.
//!
//! Receive handlers run in interrupt/callback context and cannot log
//! freely, so every accept/drop decision bumps a lock-free counter here.
//! The main loop takes a [`LinkStatsSnapshot`] and logs it on a fixed
//! interval.

use core::fmt::Write;
use core::sync::atomic::{AtomicU32, Ordering};

use embassy_time::{Duration, Instant};

/// Per-link frame counters. Lives inside a `static` link.
pub struct LinkStats {
    accepted: AtomicU32,
    malformed: AtomicU32,
    ignored_opcode: AtomicU32,
    overlapped: AtomicU32,
    stale: AtomicU32,
}

/// Point-in-time copy of [`LinkStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkStatsSnapshot {
    /// Frames the main loop took from the slot and served.
    pub accepted: u32,
    /// Frames dropped for having the wrong length.
    pub malformed: u32,
    /// Well-formed frames carrying an opcode this node does not serve.
    pub ignored_opcode: u32,
    /// Frames dropped because one was already pending or in service.
    pub overlapped: u32,
    /// Replies discarded because no query was in flight.
    pub stale: u32,
}

impl LinkStatsSnapshot {
    pub fn dropped(&self) -> u32 {
        self.malformed
            .wrapping_add(self.ignored_opcode)
            .wrapping_add(self.overlapped)
            .wrapping_add(self.stale)
    }
}

impl LinkStats {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU32::new(0),
            malformed: AtomicU32::new(0),
            ignored_opcode: AtomicU32::new(0),
            overlapped: AtomicU32::new(0),
            stale: AtomicU32::new(0),
        }
    }

    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored_opcode(&self) {
        self.ignored_opcode.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_overlapped(&self) {
        self.overlapped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale(&self) {
        self.stale.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LinkStatsSnapshot {
        LinkStatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            ignored_opcode: self.ignored_opcode.load(Ordering::Relaxed),
            overlapped: self.overlapped.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
        }
    }
}

impl Default for LinkStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-interval gate for the periodic counter log.
pub struct StatsSchedule {
    interval: Option<Duration>,
    next_due: Option<Instant>,
}

impl StatsSchedule {
    /// `interval_secs == 0` disables reporting.
    pub fn new(interval_secs: u32) -> Self {
        Self {
            interval: (interval_secs > 0).then(|| Duration::from_secs(interval_secs as u64)),
            next_due: None,
        }
    }

    /// True once per interval. The first call only starts the clock.
    pub fn due(&mut self, now: Instant) -> bool {
        let Some(interval) = self.interval else {
            return false;
        };
        match self.next_due {
            None => {
                self.next_due = Some(now + interval);
                false
            }
            Some(at) if now >= at => {
                self.next_due = Some(now + interval);
                true
            }
            Some(_) => false,
        }
    }
}

/// Space-separated upper-case hex dump of a frame. Frames longer than
/// 16 bytes are cut short with a trailing `..`.
pub fn frame_hex(frame: &[u8]) -> heapless::String<52> {
    const MAX_BYTES: usize = 16;
    let mut s = heapless::String::new();
    for (i, b) in frame.iter().take(MAX_BYTES).enumerate() {
        if i > 0 {
            let _ = s.push(' ');
        }
        let _ = write!(s, "{b:02X}");
    }
    if frame.len() > MAX_BYTES {
        let _ = s.push_str(" ..");
    }
    s
}
