//! Both nodes wired back to back over an in-memory "air".
//!
//! Each millisecond the Control node ticks, its frames are delivered to
//! the Sense link, the Sense node ticks, and its frames are delivered back.

use levelguard::app::events::AppEvent;
use levelguard::config::NodeConfig;
use levelguard::fsm::control::{ControlState, CycleOutcome};
use levelguard::fsm::sense::SenseState;
use levelguard::protocol::LevelStatus;

use crate::rig::{ControlRig, SenseRig};

const QUERY_BYTES: [u8; 12] = [
    0x0B, 0x01, 0x01, 0x30, 0x31, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x00,
];

struct Pair {
    control: ControlRig,
    sense: SenseRig,
    /// Lose every Control → Sense frame.
    drop_queries: bool,
}

impl Pair {
    fn new(config: NodeConfig, level: LevelStatus) -> Self {
        Self {
            control: ControlRig::new(config.clone()),
            sense: SenseRig::new(config, level),
            drop_queries: false,
        }
    }

    fn step(&mut self) {
        self.control.step();
        for frame in self.control.radio.take_unread() {
            if !self.drop_queries {
                self.sense.receive(&frame);
            }
        }
        self.sense.step();
        for frame in self.sense.radio.take_unread() {
            self.control.link.on_packet_received(&frame);
        }
    }

    fn run_for(&mut self, ms: u64) {
        for _ in 0..ms {
            self.step();
        }
    }

    fn press(&mut self) {
        self.control.edge();
    }
}

#[test]
fn valid_level_runs_pump_then_idles() {
    let mut p = Pair::new(NodeConfig::default(), LevelStatus::Valid);
    p.press();
    p.run_for(20);

    assert_eq!(p.control.state(), ControlState::Actuating);
    assert!(p.control.hw.pump_on());
    assert_eq!(p.control.radio.sent, vec![QUERY_BYTES.to_vec()]);
    assert_eq!(p.sense.radio.sent, vec![QUERY_BYTES.to_vec()]);

    p.run_for(1_000);
    assert_eq!(p.control.state(), ControlState::AwaitingButton);
    assert!(!p.control.hw.pump_on());
    assert_eq!(p.control.sink.count(&AppEvent::PumpStarted), 1);
    assert!(
        p.control
            .sink
            .contains(&AppEvent::CycleCompleted(CycleOutcome::Actuated))
    );
    assert_eq!(p.sense.state(), SenseState::Idle);
}

#[test]
fn invalid_level_never_runs_pump() {
    let mut p = Pair::new(NodeConfig::default(), LevelStatus::Invalid);
    p.press();
    p.run_for(3_000);

    assert!(!p.control.hw.pump_ever_on());
    assert!(!p.control.hw.indicator_on());
    assert_eq!(p.sense.radio.sent.len(), 1);
    assert_eq!(p.sense.radio.sent[0][2], 0x00);
    assert!(
        p.control
            .sink
            .contains(&AppEvent::CycleCompleted(CycleOutcome::LevelInvalid))
    );
}

#[test]
fn lost_query_times_out_without_actuation() {
    let mut p = Pair::new(NodeConfig::default(), LevelStatus::Valid);
    p.drop_queries = true;
    p.press();
    p.run_for(2_100);

    assert!(p.sense.radio.sent.is_empty());
    assert!(!p.control.hw.pump_ever_on());
    assert!(
        p.control
            .sink
            .contains(&AppEvent::CycleCompleted(CycleOutcome::TimedOut))
    );
    assert!(p.control.latch.is_enabled());
}

#[test]
fn query_inside_sense_settle_window_goes_unanswered() {
    let mut cfg = NodeConfig::default();
    cfg.pump_on_ms = 10;
    let mut p = Pair::new(cfg, LevelStatus::Valid);

    p.press();
    p.run_for(40);
    assert_eq!(p.control.state(), ControlState::AwaitingButton);
    assert_eq!(p.sense.state(), SenseState::Replying);

    // Second cycle starts while the Sense node is still settling.
    p.press();
    p.run_for(2_100);

    assert_eq!(p.control.radio.sent.len(), 2);
    assert_eq!(p.sense.radio.sent.len(), 1);
    assert!(p.sense.sink.contains(&AppEvent::RequestDropped));
    assert!(
        p.control
            .sink
            .contains(&AppEvent::CycleCompleted(CycleOutcome::TimedOut))
    );
    assert_eq!(p.control.sink.count(&AppEvent::PumpStarted), 1);
}

#[test]
fn repeated_cycles_after_settle_each_actuate() {
    let mut cfg = NodeConfig::default();
    cfg.pump_on_ms = 100;
    let mut p = Pair::new(cfg, LevelStatus::Valid);

    for _ in 0..3 {
        p.press();
        p.run_for(600);
    }
    assert_eq!(p.control.sink.count(&AppEvent::PumpStarted), 3);
    assert_eq!(p.sense.radio.sent.len(), 3);
    assert!(!p.control.hw.pump_on());
}
