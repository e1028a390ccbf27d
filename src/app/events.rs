//! Outbound application events.
//!
//! The role services emit these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them (serial log, test recorder).

use crate::diagnostics::LinkStatsSnapshot;
use crate::error::{ActuatorError, SensorError};
use crate::fsm::control::{ControlState, CycleOutcome};
use crate::fsm::sense::SenseState;
use crate::protocol::LevelStatus;

/// State of either node role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Control(ControlState),
    Sense(SenseState),
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(NodeState),

    /// The FSM transitioned between states.
    StateChanged { from: NodeState, to: NodeState },

    // ── Control ──────────────────────────────────────────────
    /// Debounced press accepted.
    ButtonPressed,
    /// Level query handed to the radio.
    QuerySent,
    /// Reply taken from the slot while a query was in flight.
    ReplyReceived(LevelStatus),
    /// No reply before the deadline; the cycle ended without actuation.
    ReplyTimedOut { waited_ms: u64 },
    PumpStarted,
    PumpStopped,
    /// A query/actuate cycle ended.
    CycleCompleted(CycleOutcome),

    // ── Sense ────────────────────────────────────────────────
    /// Query taken from the slot; carries the switch reading.
    RequestAccepted(LevelStatus),
    /// Reply handed to the radio.
    ReplySent(LevelStatus),
    /// A query arrived while the previous one was still being served.
    RequestDropped,

    // ── Shared ───────────────────────────────────────────────
    RadioSendFailed,
    ActuatorFault(ActuatorError),
    SensorFault(SensorError),
    /// Periodic receive counters.
    LinkStats(LinkStatsSnapshot),
}
