//! Control node state table: button press → level query → pump pulse.
//!
//! ```text
//!  IDLE ──▶ AWAITING_BUTTON ──[press]──▶ QUERY_IN_FLIGHT
//!   ▲                                       │   │   │
//!   │      [reply invalid / timeout / send failed]  │
//!   ├───────────────────────────────────────┘   │
//!   │                                   [reply valid]
//!   │                                           ▼
//!   └──────────────[on-time elapsed]───────── ACTUATING
//! ```
//!
//! The pump is only ever commanded on inside `Actuating`, and both
//! `actuating_exit` and `idle_enter` force it off, so every path out of
//! a cycle leaves the pump off.

use embassy_time::{Duration, Instant};
use log::{info, warn};

use super::{Fsm, StateDescriptor, StateId};
use crate::config::NodeConfig;
use crate::protocol::{LevelStatus, Packet};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControlState {
    Idle = 0,
    AwaitingButton = 1,
    QueryInFlight = 2,
    Actuating = 3,
}

impl StateId for ControlState {
    const COUNT: usize = 4;

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::AwaitingButton,
            2 => Self::QueryInFlight,
            3 => Self::Actuating,
            _ => {
                debug_assert!(false, "invalid control state index: {idx}");
                Self::Idle
            }
        }
    }
}

pub type ControlFsm = Fsm<ControlState, ControlContext, { <ControlState as StateId>::COUNT }>;

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Desired output levels, applied by the service after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlCommands {
    pub pump_on: bool,
    pub indicator_on: bool,
    /// Whether the button interrupt source is armed.
    pub button_enabled: bool,
}

impl ControlCommands {
    pub const fn all_off() -> Self {
        Self {
            pump_on: false,
            indicator_on: false,
            button_enabled: false,
        }
    }
}

/// How a query/actuate cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Level confirmed, pump ran for the full on-time.
    Actuated,
    /// Sense node reported an unsafe level; pump untouched.
    LevelInvalid,
    /// No reply before the deadline; pump untouched.
    TimedOut,
    /// The query never left the radio; pump untouched.
    SendFailed,
    /// Cancelled from outside; all outputs forced off.
    Aborted,
}

pub struct ControlContext {
    /// Time of the current tick, set by the service.
    pub now: Instant,
    pub pump_on_time: Duration,
    /// `None` waits for a reply forever.
    pub reply_timeout: Option<Duration>,
    pub indicate_valid_reply: bool,

    // Inputs (written by the service before each tick)
    pub press: bool,
    pub reply: Option<Packet>,
    pub send_failed: bool,

    // Outputs (read by the service after each tick)
    pub commands: ControlCommands,
    pub outbox: Option<Packet>,
    pub outcome: Option<CycleOutcome>,

    // Bookkeeping
    pub deadline: Option<Instant>,
    pub query_sent_at: Option<Instant>,
    pub last_level: Option<LevelStatus>,
}

impl ControlContext {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            now: Instant::from_ticks(0),
            pump_on_time: config.pump_on_time(),
            reply_timeout: config.reply_timeout.as_duration(),
            indicate_valid_reply: config.indicate_valid_reply,
            press: false,
            reply: None,
            send_failed: false,
            commands: ControlCommands::all_off(),
            outbox: None,
            outcome: None,
            deadline: None,
            query_sent_at: None,
            last_level: None,
        }
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| self.now >= d)
    }

    fn ms_since_query(&self) -> u64 {
        self.query_sent_at
            .map_or(0, |t| self.now.saturating_duration_since(t).as_millis())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table()
-> [StateDescriptor<ControlState, ControlContext>; <ControlState as StateId>::COUNT] {
    [
        StateDescriptor {
            id: ControlState::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        StateDescriptor {
            id: ControlState::AwaitingButton,
            name: "AwaitingButton",
            on_enter: None,
            on_exit: None,
            on_update: awaiting_update,
        },
        StateDescriptor {
            id: ControlState::QueryInFlight,
            name: "QueryInFlight",
            on_enter: Some(query_enter),
            on_exit: None,
            on_update: query_update,
        },
        StateDescriptor {
            id: ControlState::Actuating,
            name: "Actuating",
            on_enter: Some(actuating_enter),
            on_exit: Some(actuating_exit),
            on_update: actuating_update,
        },
    ]
}

pub fn build_fsm() -> ControlFsm {
    Fsm::new("CONTROL", build_state_table(), ControlState::Idle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE — end of cycle, everything off, button re-armed
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut ControlContext) {
    ctx.commands = ControlCommands {
        button_enabled: true,
        ..ControlCommands::all_off()
    };
    ctx.press = false;
    ctx.reply = None;
    ctx.send_failed = false;
    ctx.deadline = None;
    info!("IDLE: outputs off, button re-armed");
}

fn idle_update(_ctx: &mut ControlContext) -> Option<ControlState> {
    Some(ControlState::AwaitingButton)
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAITING_BUTTON
// ═══════════════════════════════════════════════════════════════════════════

fn awaiting_update(ctx: &mut ControlContext) -> Option<ControlState> {
    if ctx.press {
        ctx.press = false;
        return Some(ControlState::QueryInFlight);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  QUERY_IN_FLIGHT — button masked, waiting on the reply slot
// ═══════════════════════════════════════════════════════════════════════════

fn query_enter(ctx: &mut ControlContext) {
    ctx.commands.button_enabled = false;
    ctx.reply = None;
    ctx.send_failed = false;
    ctx.outbox = Some(Packet::query());
    ctx.query_sent_at = Some(ctx.now);
    ctx.deadline = ctx.reply_timeout.map(|t| ctx.now + t);
    match ctx.reply_timeout {
        Some(t) => info!("QUERY: level query queued, waiting up to {}ms", t.as_millis()),
        None => info!("QUERY: level query queued, waiting without timeout"),
    }
}

fn query_update(ctx: &mut ControlContext) -> Option<ControlState> {
    if let Some(reply) = ctx.reply.take() {
        let level = reply.level();
        ctx.last_level = Some(level);
        if level.is_valid() {
            if ctx.indicate_valid_reply {
                ctx.commands.indicator_on = true;
            }
            info!("QUERY: level valid after {}ms", ctx.ms_since_query());
            return Some(ControlState::Actuating);
        }
        info!("QUERY: level invalid, pump stays off");
        ctx.outcome = Some(CycleOutcome::LevelInvalid);
        return Some(ControlState::Idle);
    }

    if ctx.send_failed {
        warn!("QUERY: query was not sent, abandoning cycle");
        ctx.outcome = Some(CycleOutcome::SendFailed);
        return Some(ControlState::Idle);
    }

    if ctx.deadline_passed() {
        warn!(
            "QUERY: no reply after {}ms, abandoning cycle (pump stays off)",
            ctx.ms_since_query()
        );
        ctx.outcome = Some(CycleOutcome::TimedOut);
        return Some(ControlState::Idle);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTUATING — pump on for the fixed on-time
// ═══════════════════════════════════════════════════════════════════════════

fn actuating_enter(ctx: &mut ControlContext) {
    ctx.commands.pump_on = true;
    ctx.deadline = Some(ctx.now + ctx.pump_on_time);
    info!("ACTUATING: pump on for {}ms", ctx.pump_on_time.as_millis());
}

fn actuating_exit(ctx: &mut ControlContext) {
    ctx.commands.pump_on = false;
    ctx.commands.indicator_on = false;
    ctx.deadline = None;
    info!("ACTUATING: pump off");
}

fn actuating_update(ctx: &mut ControlContext) -> Option<ControlState> {
    if ctx.deadline_passed() {
        ctx.outcome = Some(CycleOutcome::Actuated);
        return Some(ControlState::Idle);
    }
    None
}
