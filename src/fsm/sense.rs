//! Sense node state table: query → sample switch → one reply → settle.
//!
//! ```text
//!  IDLE ──[request + sample]──▶ REQUEST_RECEIVED ──[reply sent]──▶ REPLYING
//!   ▲                                                                 │
//!   └────────────────────────[settle window elapsed]──────────────────┘
//! ```
//!
//! Requests that arrive outside `Idle` are dropped by the service, so
//! back-to-back queries inside one settle window get a single reply.

use embassy_time::{Duration, Instant};
use log::info;

use super::{Fsm, StateDescriptor, StateId};
use crate::config::NodeConfig;
use crate::protocol::{LevelStatus, Packet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SenseState {
    Idle = 0,
    RequestReceived = 1,
    Replying = 2,
}

impl StateId for SenseState {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::RequestReceived,
            2 => Self::Replying,
            _ => {
                debug_assert!(false, "invalid sense state index: {idx}");
                Self::Idle
            }
        }
    }
}

pub type SenseFsm = Fsm<SenseState, SenseContext, { <SenseState as StateId>::COUNT }>;

pub struct SenseContext {
    pub now: Instant,
    pub settle: Duration,

    // Inputs
    /// Accepted query, posted by the service while `Idle`.
    pub request: Option<Packet>,
    /// Switch reading taken when the request was accepted. `None` replies
    /// `Invalid`.
    pub level: Option<LevelStatus>,

    // Outputs
    pub outbox: Option<Packet>,

    // Bookkeeping
    pub deadline: Option<Instant>,
    pub last_reply: Option<LevelStatus>,
    pub replies_queued: u32,
}

impl SenseContext {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            now: Instant::from_ticks(0),
            settle: config.settle(),
            request: None,
            level: None,
            outbox: None,
            deadline: None,
            last_reply: None,
            replies_queued: 0,
        }
    }
}

pub fn build_state_table()
-> [StateDescriptor<SenseState, SenseContext>; <SenseState as StateId>::COUNT] {
    [
        StateDescriptor {
            id: SenseState::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        StateDescriptor {
            id: SenseState::RequestReceived,
            name: "RequestReceived",
            on_enter: Some(request_enter),
            on_exit: None,
            on_update: request_update,
        },
        StateDescriptor {
            id: SenseState::Replying,
            name: "Replying",
            on_enter: Some(replying_enter),
            on_exit: None,
            on_update: replying_update,
        },
    ]
}

pub fn build_fsm() -> SenseFsm {
    Fsm::new("SENSE", build_state_table(), SenseState::Idle)
}

fn idle_enter(ctx: &mut SenseContext) {
    ctx.request = None;
    ctx.level = None;
    ctx.deadline = None;
}

fn idle_update(ctx: &mut SenseContext) -> Option<SenseState> {
    ctx.request.is_some().then_some(SenseState::RequestReceived)
}

fn request_enter(ctx: &mut SenseContext) {
    // Fail closed: no reading means "not valid".
    let status = ctx.level.unwrap_or(LevelStatus::Invalid);
    ctx.outbox = Some(Packet::reply(status));
    ctx.last_reply = Some(status);
    ctx.replies_queued = ctx.replies_queued.wrapping_add(1);
    info!("REQUEST: level {:?}, reply queued", status);
}

fn request_update(ctx: &mut SenseContext) -> Option<SenseState> {
    // The service drains the outbox right after the tick that queued it.
    ctx.outbox.is_none().then_some(SenseState::Replying)
}

fn replying_enter(ctx: &mut SenseContext) {
    ctx.deadline = Some(ctx.now + ctx.settle);
    info!("REPLYING: settling for {}ms", ctx.settle.as_millis());
}

fn replying_update(ctx: &mut SenseContext) -> Option<SenseState> {
    if ctx.deadline.is_some_and(|d| ctx.now >= d) {
        return Some(SenseState::Idle);
    }
    None
}
