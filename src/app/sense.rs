//! Sense node service.
//!
//! Drains the request slot while idle, samples the level switch, lets
//! the FSM build the reply, and hands it to the radio. While a request is
//! being served, anything new in the slot is dropped and counted.

use embassy_time::Instant;
use log::{debug, info, warn};

use crate::config::NodeConfig;
use crate::diagnostics::{StatsSchedule, frame_hex};
use crate::error::Error;
use crate::fsm::sense::{SenseContext, SenseFsm, SenseState, build_fsm};
use crate::protocol::LevelStatus;
use crate::radio::{RadioTransport, SenseLink};

use super::events::{AppEvent, NodeState};
use super::ports::{EventSink, LevelSensorPort};

pub struct SenseService<'a> {
    fsm: SenseFsm,
    ctx: SenseContext,
    link: &'a SenseLink,
    stats_schedule: StatsSchedule,
}

impl<'a> SenseService<'a> {
    pub fn new(config: &NodeConfig, link: &'a SenseLink) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            fsm: build_fsm(),
            ctx: SenseContext::new(config),
            link,
            stats_schedule: StatsSchedule::new(config.stats_log_interval_secs),
        })
    }

    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(NodeState::Sense(self.state())));
        info!("SenseService started in {:?}", self.state());
    }

    /// One main-loop pass: request slot → switch → FSM → radio.
    pub fn tick(
        &mut self,
        now: Instant,
        sensor: &mut impl LevelSensorPort,
        radio: &mut impl RadioTransport,
        sink: &mut impl EventSink,
    ) {
        self.ctx.now = now;
        let prev_state = self.state();

        // 1. Request slot
        if prev_state == SenseState::Idle {
            if let Some(request) = self.link.take_request() {
                debug!("request frame: {}", frame_hex(&request.to_bytes()));
                let level = self.sample(sensor, sink);
                sink.emit(&AppEvent::RequestAccepted(level));
                self.ctx.request = Some(request);
                self.ctx.level = Some(level);
            }
        } else if self.link.drop_overlapping() {
            debug!("request dropped in {:?}", prev_state);
            sink.emit(&AppEvent::RequestDropped);
        }

        // 2. FSM tick
        self.fsm.tick(&mut self.ctx);

        // 3. Radio
        if let Some(reply) = self.ctx.outbox.take() {
            match radio.send(&reply.to_bytes()) {
                Ok(()) => sink.emit(&AppEvent::ReplySent(reply.level())),
                Err(e) => {
                    // The settle window still applies.
                    warn!("reply send failed: {:?}", e);
                    sink.emit(&AppEvent::RadioSendFailed);
                }
            }
        }

        let state = self.state();
        if state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: NodeState::Sense(prev_state),
                to: NodeState::Sense(state),
            });
        }

        if self.stats_schedule.due(now) {
            self.report_stats(sink);
        }
    }

    pub fn report_stats(&self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::LinkStats(self.link.stats()));
    }

    pub fn state(&self) -> SenseState {
        self.fsm.current_state()
    }

    /// Replies queued since start, sent or not.
    pub fn replies_queued(&self) -> u32 {
        self.ctx.replies_queued
    }

    pub fn last_reply(&self) -> Option<LevelStatus> {
        self.ctx.last_reply
    }

    fn sample(&self, sensor: &mut impl LevelSensorPort, sink: &mut impl EventSink) -> LevelStatus {
        match sensor.read_level() {
            Ok(level) => level,
            Err(e) => {
                warn!("level read failed ({}), replying invalid", e);
                sink.emit(&AppEvent::SensorFault(e));
                LevelStatus::Invalid
            }
        }
    }
}
