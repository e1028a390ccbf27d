//! Receive-side handlers for each node role.
//!
//! A link pairs the one-packet [`EventSlot`] with its [`LinkStats`]. The
//! radio driver calls `on_packet_received` from its receive callback; the
//! role's service drains the slot from the main loop.
//!
//! ```text
//!  radio rx cb ──▶ on_packet_received ──▶ decode ──▶ filter ──▶ slot.post
//!                                            │          │           │
//!                                        malformed   ignored    overlapped
//!
//!  main loop ──▶ take (accepted) | drop_overlapping (overlapped)
//!                                | discard_reply    (stale)
//! ```
//!
//! Each frame lands in exactly one counter once the slot is drained.
//!
//! Both links are `const`-constructible so they can live in a `static`.

use log::debug;

use crate::diagnostics::{LinkStats, LinkStatsSnapshot};
use crate::events::EventSlot;
use crate::protocol::{Command, Packet};

/// What a receive handler did with a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxOutcome {
    /// Posted to the empty slot; counted when the main loop decides.
    Queued,
    Malformed,
    IgnoredOpcode,
    Overlapped,
}

// ---------------------------------------------------------------------------
// Control side: reply slot
// ---------------------------------------------------------------------------

/// Control node receive path. Any well-formed frame is a candidate reply.
pub struct ControlLink {
    reply: EventSlot<Packet>,
    stats: LinkStats,
}

impl ControlLink {
    pub const fn new() -> Self {
        Self {
            reply: EventSlot::new(),
            stats: LinkStats::new(),
        }
    }

    /// Radio receive entry point. Safe to call from interrupt context.
    pub fn on_packet_received(&self, frame: &[u8]) -> RxOutcome {
        let packet = match Packet::decode(frame) {
            Ok(p) => p,
            Err(_) => {
                self.stats.record_malformed();
                return RxOutcome::Malformed;
            }
        };
        post_counted(&self.reply, &self.stats, packet)
    }

    /// Take the pending reply, if any.
    pub fn take_reply(&self) -> Option<Packet> {
        take_counted(&self.reply, &self.stats)
    }

    /// Drop any pending reply, counted as stale. Returns whether one was
    /// dropped.
    pub fn discard_reply(&self) -> bool {
        let had = self.reply.clear();
        if had {
            self.stats.record_stale();
            debug!("CONTROL link: stale reply discarded");
        }
        had
    }

    pub fn stats(&self) -> LinkStatsSnapshot {
        self.stats.snapshot()
    }
}

impl Default for ControlLink {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Sense side: request slot
// ---------------------------------------------------------------------------

/// Sense node receive path. Only `OperateSensor` queries are accepted.
pub struct SenseLink {
    request: EventSlot<Packet>,
    stats: LinkStats,
}

impl SenseLink {
    pub const fn new() -> Self {
        Self {
            request: EventSlot::new(),
            stats: LinkStats::new(),
        }
    }

    /// Radio receive entry point. Safe to call from interrupt context.
    pub fn on_packet_received(&self, frame: &[u8]) -> RxOutcome {
        let packet = match Packet::decode(frame) {
            Ok(p) => p,
            Err(_) => {
                self.stats.record_malformed();
                return RxOutcome::Malformed;
            }
        };
        if packet.command() != Command::OperateSensor {
            self.stats.record_ignored_opcode();
            return RxOutcome::IgnoredOpcode;
        }
        post_counted(&self.request, &self.stats, packet)
    }

    /// Take the pending request, if any.
    pub fn take_request(&self) -> Option<Packet> {
        take_counted(&self.request, &self.stats)
    }

    /// Drop a request that arrived while one was being served. Counted as
    /// overlapped. Returns whether one was dropped.
    pub fn drop_overlapping(&self) -> bool {
        let had = self.request.clear();
        if had {
            self.stats.record_overlapped();
        }
        had
    }

    pub fn stats(&self) -> LinkStatsSnapshot {
        self.stats.snapshot()
    }
}

impl Default for SenseLink {
    fn default() -> Self {
        Self::new()
    }
}

fn post_counted(slot: &EventSlot<Packet>, stats: &LinkStats, packet: Packet) -> RxOutcome {
    if slot.post(packet) {
        RxOutcome::Queued
    } else {
        stats.record_overlapped();
        RxOutcome::Overlapped
    }
}

fn take_counted(slot: &EventSlot<Packet>, stats: &LinkStats) -> Option<Packet> {
    let packet = slot.take()?;
    stats.record_accepted();
    Some(packet)
}
