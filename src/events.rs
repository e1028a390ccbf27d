//! Interrupt → main-loop event slots.
//!
//! Each slot holds **at most one** pending event. The interrupt side posts,
//! the main loop takes (or clears). There is no queue behind the slot: a
//! post while an event is still pending is refused and the caller counts
//! it as dropped.
//!
//! ```text
//! ┌─────────────┐  post()   ┌──────────────┐  take()   ┌──────────────┐
//! │ Radio ISR   │──────────▶│  EventSlot   │──────────▶│  Main Loop   │
//! │ (producer)  │           │  (cap = 1)   │◀──────────│  (consumer)  │
//! └─────────────┘           └──────────────┘  clear()  └──────────────┘
//! ```
//!
//! Backed by an `embassy-sync` channel with a critical-section mutex so
//! the slot can live in a `static` shared with interrupt handlers.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Single-producer / single-consumer one-event mailbox.
pub struct EventSlot<T> {
    channel: Channel<CriticalSectionRawMutex, T, 1>,
}

impl<T> EventSlot<T> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Post an event. Safe to call from interrupt context.
    /// Returns `false` if an event is already pending (this one is dropped).
    pub fn post(&self, event: T) -> bool {
        self.channel.try_send(event).is_ok()
    }

    /// Take the pending event, if any, leaving the slot empty.
    pub fn take(&self) -> Option<T> {
        self.channel.try_receive().ok()
    }

    /// Discard any pending event. Returns whether one was discarded.
    pub fn clear(&self) -> bool {
        let had = self.is_pending();
        self.channel.clear();
        had
    }

    pub fn is_pending(&self) -> bool {
        !self.channel.is_empty()
    }
}

impl<T> Default for EventSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
