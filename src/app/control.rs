//! Control node service — the hexagonal core for the pump side.
//!
//! [`ControlService`] owns the control FSM, its context, and the button
//! debouncer. It borrows the two interrupt-shared objects (button latch
//! and reply link) and reaches everything else through ports passed in
//! at each call.
//!
//! ```text
//!  ButtonLatch ──▶ ┌────────────────────────┐ ──▶ RadioTransport
//!  ControlLink ──▶ │     ControlService      │ ──▶ ActuatorPort
//!                  │  Debouncer · FSM        │ ──▶ EventSink
//!                  └────────────────────────┘
//! ```

use embassy_time::Instant;
use log::{debug, info, warn};

use crate::config::NodeConfig;
use crate::diagnostics::{StatsSchedule, frame_hex};
use crate::drivers::button::{ButtonDebouncer, ButtonEvent, ButtonLatch};
use crate::error::Error;
use crate::fsm::control::{
    ControlCommands, ControlContext, ControlFsm, ControlState, CycleOutcome, build_fsm,
};
use crate::radio::{ControlLink, RadioTransport};

use super::events::{AppEvent, NodeState};
use super::ports::{ActuatorPort, EventSink};

pub struct ControlService<'a> {
    fsm: ControlFsm,
    ctx: ControlContext,
    debouncer: ButtonDebouncer,
    latch: &'a ButtonLatch,
    link: &'a ControlLink,
    /// Output levels last written successfully.
    applied: ControlCommands,
    stats_schedule: StatsSchedule,
    cycles: u32,
}

impl<'a> ControlService<'a> {
    /// Construct the service. Does **not** start the FSM; call
    /// [`start`](Self::start) next.
    pub fn new(
        config: &NodeConfig,
        latch: &'a ButtonLatch,
        link: &'a ControlLink,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            fsm: build_fsm(),
            ctx: ControlContext::new(config),
            debouncer: ButtonDebouncer::new(config.debounce()),
            latch,
            link,
            applied: ControlCommands::all_off(),
            stats_schedule: StatsSchedule::new(config.stats_log_interval_secs),
            cycles: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force every output off, enter `Idle`, and arm the button.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        self.applied = ControlCommands::all_off();
        self.latch.set_enabled(false);

        self.fsm.start(&mut self.ctx);
        self.apply_outputs(hw, sink);
        sink.emit(&AppEvent::Started(NodeState::Control(self.state())));
        info!("ControlService started in {:?}", self.state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One main-loop pass: button → reply slot → FSM → radio → outputs.
    pub fn tick(
        &mut self,
        now: Instant,
        hw: &mut impl ActuatorPort,
        radio: &mut impl RadioTransport,
        sink: &mut impl EventSink,
    ) {
        self.ctx.now = now;
        let prev_state = self.state();

        // 1. Button
        if let Some(ButtonEvent::Press) = self.debouncer.tick(self.latch, now) {
            self.debouncer.consume();
            if matches!(prev_state, ControlState::Idle | ControlState::AwaitingButton) {
                self.ctx.press = true;
                sink.emit(&AppEvent::ButtonPressed);
            } else {
                debug!("press ignored in {:?}", prev_state);
            }
        }

        // 2. Reply slot: only meaningful while a query is in flight
        if prev_state == ControlState::QueryInFlight {
            if let Some(reply) = self.link.take_reply() {
                debug!("reply frame: {}", frame_hex(&reply.to_bytes()));
                sink.emit(&AppEvent::ReplyReceived(reply.level()));
                self.ctx.reply = Some(reply);
            }
        } else {
            self.link.discard_reply();
        }

        // 3. FSM tick (pure state logic)
        self.fsm.tick(&mut self.ctx);

        // 4. Radio
        self.flush_outbox(radio, sink);

        // 5. Outputs
        self.apply_outputs(hw, sink);

        // 6. Cycle bookkeeping
        self.finish_cycle(sink);

        self.emit_state_change(prev_state, sink);

        if self.stats_schedule.due(now) {
            self.report_stats(sink);
        }
    }

    /// Cancel any cycle in progress and force all outputs off.
    pub fn abort(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let prev_state = self.state();
        if matches!(
            prev_state,
            ControlState::QueryInFlight | ControlState::Actuating
        ) {
            warn!("cycle aborted in {:?}", prev_state);
            self.ctx.outcome = Some(CycleOutcome::Aborted);
        }
        self.fsm.force_transition(ControlState::Idle, &mut self.ctx);
        self.link.discard_reply();

        hw.all_off();
        self.apply_outputs(hw, sink);
        self.finish_cycle(sink);
        self.emit_state_change(prev_state, sink);
    }

    /// Emit the current link counters.
    pub fn report_stats(&self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::LinkStats(self.link.stats()));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> ControlState {
        self.fsm.current_state()
    }

    /// Cycles completed since start, whatever their outcome.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    // ── Internal ──────────────────────────────────────────────

    fn flush_outbox(&mut self, radio: &mut impl RadioTransport, sink: &mut impl EventSink) {
        let Some(query) = self.ctx.outbox.take() else {
            return;
        };
        // A reply can only answer a query sent after this point.
        self.link.discard_reply();
        match radio.send(&query.to_bytes()) {
            Ok(()) => sink.emit(&AppEvent::QuerySent),
            Err(e) => {
                warn!("query send failed: {:?}", e);
                self.ctx.send_failed = true;
                sink.emit(&AppEvent::RadioSendFailed);
            }
        }
    }

    /// Translate FSM output commands into port calls. Only writes outputs
    /// that changed; a failed write is retried on the next tick.
    fn apply_outputs(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let want = self.ctx.commands;

        // ── Pump ──────────────────────────────────────────────
        if want.pump_on != self.applied.pump_on {
            match hw.set_pump(want.pump_on) {
                Ok(()) => {
                    self.applied.pump_on = want.pump_on;
                    sink.emit(if want.pump_on {
                        &AppEvent::PumpStarted
                    } else {
                        &AppEvent::PumpStopped
                    });
                }
                Err(e) => {
                    warn!("pump write failed: {}", e);
                    sink.emit(&AppEvent::ActuatorFault(e));
                }
            }
        }

        // ── Indicator ────────────────────────────────────────
        if want.indicator_on != self.applied.indicator_on {
            match hw.set_indicator(want.indicator_on) {
                Ok(()) => self.applied.indicator_on = want.indicator_on,
                Err(e) => {
                    warn!("indicator write failed: {}", e);
                    sink.emit(&AppEvent::ActuatorFault(e));
                }
            }
        }

        // ── Button source ────────────────────────────────────
        if want.button_enabled != self.applied.button_enabled {
            if want.button_enabled {
                // Anything latched while masked belongs to the old cycle.
                self.debouncer.resync(self.latch);
            }
            self.latch.set_enabled(want.button_enabled);
            self.applied.button_enabled = want.button_enabled;
        }
    }

    fn finish_cycle(&mut self, sink: &mut impl EventSink) {
        let Some(outcome) = self.ctx.outcome.take() else {
            return;
        };
        if outcome == CycleOutcome::TimedOut {
            let waited_ms = self
                .ctx
                .query_sent_at
                .map_or(0, |t| self.ctx.now.saturating_duration_since(t).as_millis());
            sink.emit(&AppEvent::ReplyTimedOut { waited_ms });
        }
        self.cycles = self.cycles.wrapping_add(1);
        info!("cycle {} finished: {:?}", self.cycles, outcome);
        sink.emit(&AppEvent::CycleCompleted(outcome));
    }

    fn emit_state_change(&self, prev: ControlState, sink: &mut impl EventSink) {
        let now = self.state();
        if now != prev {
            sink.emit(&AppEvent::StateChanged {
                from: NodeState::Control(prev),
                to: NodeState::Control(now),
            });
        }
    }
}
