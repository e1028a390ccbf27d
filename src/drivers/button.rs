//! ISR edge latch plus main-loop debouncer for the cycle button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up. The GPIO fires on the
//! falling edge. Other pins may share the interrupt vector, so the
//! handler checks the button bit before recording anything.
//!
//! ## Split
//!
//! The interrupt handler ([`ButtonLatch::on_port_interrupt`]) only bumps
//! an edge counter and stores a timestamp. The settle wait runs in
//! [`ButtonDebouncer::tick`], called from the main loop. The window is
//! measured from the ISR timestamp, not from the tick that sees the edge.
//! Both must come from the same millisecond clock.
//!
//! ```text
//!  ARMED ──[new edge]──▶ DEBOUNCING ──[window elapsed]──▶ READY
//!    ▲                    (edges absorbed)                  │
//!    └───────────────────────[consume]──────────────────────┘
//! ```
//!
//! While a cycle runs the control service disables the latch; edges seen
//! while disabled are never counted, and re-enabling resyncs the
//! debouncer so nothing latched before is replayed.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_time::{Duration, Instant};

/// Edge recorder shared between the GPIO interrupt and the main loop.
pub struct ButtonLatch {
    pin_mask: u32,
    enabled: AtomicBool,
    edge_count: AtomicU32,
    last_edge_ms: AtomicU32,
}

impl ButtonLatch {
    /// `pin_mask` selects the button bit within the port's pending mask.
    pub const fn new(pin_mask: u32) -> Self {
        Self {
            pin_mask,
            enabled: AtomicBool::new(true),
            edge_count: AtomicU32::new(0),
            last_edge_ms: AtomicU32::new(0),
        }
    }

    /// Port interrupt entry point. Lock-free, safe from ISR context.
    ///
    /// `pending_mask` is the port's interrupt-pending bits; the caller
    /// clears the hardware flag whether or not this returns `true`.
    pub fn on_port_interrupt(&self, pending_mask: u32, now_ms: u32) -> bool {
        if pending_mask & self.pin_mask == 0 {
            return false;
        }
        if !self.enabled.load(Ordering::Acquire) {
            return false;
        }
        self.last_edge_ms.store(now_ms, Ordering::Relaxed);
        self.edge_count.fetch_add(1, Ordering::Release);
        true
    }

    /// Arm or mask the button source.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Total edges recorded since boot (wrapping).
    pub fn edge_count(&self) -> u32 {
        self.edge_count.load(Ordering::Acquire)
    }

    /// ISR timestamp of the most recent recorded edge.
    pub fn last_edge_ms(&self) -> u32 {
        self.last_edge_ms.load(Ordering::Relaxed)
    }
}

/// Logical button events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Armed,
    Debouncing { since: Instant },
    Ready,
}

pub struct ButtonDebouncer {
    window: Duration,
    state: DebounceState,
    seen_edges: u32,
}

impl ButtonDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: DebounceState::Armed,
            seen_edges: 0,
        }
    }

    /// Call once per main-loop tick. Emits [`ButtonEvent::Press`] on the
    /// tick the debounce window closes; further ticks return `None` until
    /// [`consume`](Self::consume) re-arms.
    pub fn tick(&mut self, latch: &ButtonLatch, now: Instant) -> Option<ButtonEvent> {
        let edges = latch.edge_count();
        let new_edge = edges != self.seen_edges;
        self.seen_edges = edges;

        match self.state {
            DebounceState::Armed => {
                if new_edge {
                    self.state = DebounceState::Debouncing {
                        since: self.edge_instant(latch, now),
                    };
                }
                None
            }
            DebounceState::Debouncing { since } => {
                // Bounce edges inside the window are absorbed above.
                if now.saturating_duration_since(since) >= self.window {
                    self.state = DebounceState::Ready;
                    return Some(ButtonEvent::Press);
                }
                None
            }
            DebounceState::Ready => None,
        }
    }

    /// Main loop has taken the press; wait for the next physical edge.
    pub fn consume(&mut self) {
        if self.state == DebounceState::Ready {
            self.state = DebounceState::Armed;
        }
    }

    /// Forget everything latched so far and re-arm.
    pub fn resync(&mut self, latch: &ButtonLatch) {
        self.seen_edges = latch.edge_count();
        self.state = DebounceState::Armed;
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Map the latched `u32` ISR timestamp onto `now`'s timeline.
    ///
    /// An edge stamped after `now` (the ISR ran between the clock read and
    /// this tick) counts as age zero. An edge older than the window is
    /// clamped so the press fires on the next tick.
    fn edge_instant(&self, latch: &ButtonLatch, now: Instant) -> Instant {
        let age_ms = (now.as_millis() as u32).wrapping_sub(latch.last_edge_ms());
        let age_ms = if age_ms > u32::MAX / 2 { 0 } else { age_ms };
        let age = Duration::from_millis(u64::from(age_ms)).min(self.window);
        now.checked_sub(age).unwrap_or(now)
    }
}
