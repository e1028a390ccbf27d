//! Control node: button → query → reply → pump, against mock adapters.

use levelguard::app::events::{AppEvent, NodeState};
use levelguard::config::{NodeConfig, ReplyTimeout};
use levelguard::diagnostics::LinkStatsSnapshot;
use levelguard::fsm::control::{ControlState, CycleOutcome};
use levelguard::protocol::{LevelStatus, Packet};
use levelguard::ActuatorError;

use crate::rig::ControlRig;

const QUERY_BYTES: [u8; 12] = [
    0x0B, 0x01, 0x01, 0x30, 0x31, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x00,
];

fn rig() -> ControlRig {
    ControlRig::new(NodeConfig::default())
}

// ── Actuation ─────────────────────────────────────────────────

#[test]
fn valid_reply_runs_pump_for_exactly_the_on_time() {
    let mut r = rig();
    let q = r.press_until_query();
    assert_eq!(r.radio.sent, vec![QUERY_BYTES.to_vec()]);

    r.receive_reply(LevelStatus::Valid);
    r.step();
    let started = r.now_ms;
    assert_eq!(started, q + 1);
    assert_eq!(r.state(), ControlState::Actuating);
    assert!(r.hw.pump_on());
    assert!(r.hw.indicator_on());

    r.run_until(started + 999);
    assert!(r.hw.pump_on(), "pump must stay on for the whole on-time");

    r.step();
    assert_eq!(r.state(), ControlState::Idle);
    assert!(!r.hw.pump_on());
    assert!(!r.hw.indicator_on());
    assert!(r.latch.is_enabled(), "button re-armed at cycle end");

    assert_eq!(r.sink.count(&AppEvent::PumpStarted), 1);
    assert_eq!(r.sink.count(&AppEvent::PumpStopped), 1);
    assert!(r.sink.contains(&AppEvent::CycleCompleted(CycleOutcome::Actuated)));
}

#[test]
fn pump_stops_before_cycle_is_reported() {
    let mut r = rig();
    r.press_until_query();
    r.receive_reply(LevelStatus::Valid);
    r.run_for(1_100);

    let stopped = r.sink.events.iter().position(|e| *e == AppEvent::PumpStopped);
    let done = r
        .sink
        .events
        .iter()
        .position(|e| *e == AppEvent::CycleCompleted(CycleOutcome::Actuated));
    assert!(stopped.is_some() && done.is_some());
    assert!(stopped < done);
}

#[test]
fn invalid_reply_never_drives_pump() {
    let mut r = rig();
    r.press_until_query();
    r.receive_reply(LevelStatus::Invalid);
    r.step();

    assert_eq!(r.state(), ControlState::Idle);
    assert!(!r.hw.pump_ever_on());
    assert!(!r.hw.indicator_on());
    assert!(r.sink.contains(&AppEvent::ReplyReceived(LevelStatus::Invalid)));
    assert!(r.sink.contains(&AppEvent::CycleCompleted(CycleOutcome::LevelInvalid)));
    assert!(r.latch.is_enabled());
}

#[test]
fn any_nonzero_flag_counts_as_valid() {
    let mut r = rig();
    r.press_until_query();
    let frame = Packet::encode(0x80, levelguard::protocol::FILLER).to_bytes();
    r.link.on_packet_received(&frame);
    r.step();
    assert_eq!(r.state(), ControlState::Actuating);
}

#[test]
fn indicator_stays_dark_when_disabled() {
    let mut cfg = NodeConfig::default();
    cfg.indicate_valid_reply = false;
    let mut r = ControlRig::new(cfg);
    r.press_until_query();
    r.receive_reply(LevelStatus::Valid);
    r.run_for(1_100);
    assert!(r.hw.pump_ever_on());
    assert!(!r.hw.calls.contains(&crate::mock_hw::ActuatorCall::SetIndicator(true)));
}

// ── Exclusivity ───────────────────────────────────────────────

#[test]
fn edges_during_cycle_never_produce_a_second_query() {
    let mut r = rig();
    r.press_until_query();
    assert!(!r.latch.is_enabled());

    // Hammer the button while the query is in flight.
    for _ in 0..20 {
        r.edge();
        r.step();
    }
    r.receive_reply(LevelStatus::Valid);
    r.step();
    assert_eq!(r.state(), ControlState::Actuating);

    // ...and while the pump runs.
    for _ in 0..50 {
        r.edge();
        r.step();
    }
    r.run_for(1_000);
    assert_eq!(r.state(), ControlState::AwaitingButton);

    // Nothing latched during the cycle is replayed afterwards.
    r.run_for(100);
    assert_eq!(r.radio.sent.len(), 1);
    assert_eq!(r.sink.count(&AppEvent::ButtonPressed), 1);
}

#[test]
fn contact_bounce_yields_one_query() {
    let mut r = rig();
    r.edge();
    r.step();
    r.edge();
    r.step();
    r.edge();
    r.run_for(50);
    assert_eq!(r.radio.sent.len(), 1);
    assert_eq!(r.state(), ControlState::QueryInFlight);
}

#[test]
fn debounce_is_measured_from_the_edge_time() {
    let mut r = rig();
    r.run_until(100);
    r.edge();
    let q = r.press_until_query();
    assert_eq!(q, 110, "10 ms after the ISR timestamp, not after the first tick");
}

#[test]
fn next_press_after_cycle_starts_a_new_query() {
    let mut r = rig();
    r.press_until_query();
    r.receive_reply(LevelStatus::Invalid);
    r.run_for(5);
    r.press_until_query();
    assert_eq!(r.radio.sent.len(), 2);
}

// ── Reply wait policy ─────────────────────────────────────────

#[test]
fn bounded_wait_times_out_fail_closed() {
    let mut r = rig();
    let q = r.press_until_query();

    r.run_until(q + 1_999);
    assert_eq!(r.state(), ControlState::QueryInFlight);

    r.step();
    assert_eq!(r.state(), ControlState::Idle);
    assert!(!r.hw.pump_ever_on());
    assert!(r.sink.contains(&AppEvent::ReplyTimedOut { waited_ms: 2_000 }));
    assert!(r.sink.contains(&AppEvent::CycleCompleted(CycleOutcome::TimedOut)));
    assert!(r.latch.is_enabled());
}

#[test]
fn late_reply_after_timeout_is_discarded() {
    let mut r = rig();
    let q = r.press_until_query();
    r.run_until(q + 2_000);
    assert_eq!(r.state(), ControlState::Idle);

    r.receive_reply(LevelStatus::Valid);
    r.run_for(10);
    assert!(!r.hw.pump_ever_on());
    assert!(r.link.take_reply().is_none());
}

#[test]
fn unbounded_wait_holds_until_reply() {
    let mut cfg = NodeConfig::default();
    cfg.reply_timeout = ReplyTimeout::Unbounded;
    let mut r = ControlRig::new(cfg);
    r.press_until_query();

    r.run_for(60_000);
    assert_eq!(r.state(), ControlState::QueryInFlight);
    assert!(!r.hw.pump_ever_on());

    r.receive_reply(LevelStatus::Valid);
    r.step();
    assert_eq!(r.state(), ControlState::Actuating);
}

#[test]
fn short_frame_never_unblocks_the_wait() {
    let mut r = rig();
    let q = r.press_until_query();

    let bytes = Packet::reply(LevelStatus::Valid).to_bytes();
    r.link.on_packet_received(&bytes[..11]);
    r.run_until(q + 1_999);
    assert_eq!(r.state(), ControlState::QueryInFlight);

    r.step();
    assert!(r.sink.contains(&AppEvent::CycleCompleted(CycleOutcome::TimedOut)));
    assert!(!r.hw.pump_ever_on());
    assert_eq!(r.link.stats().malformed, 1);
}

#[test]
fn reply_received_before_the_query_is_ignored() {
    let mut r = rig();
    r.step();
    r.receive_reply(LevelStatus::Valid);
    let q = r.press_until_query();
    r.run_until(q + 2_000);

    assert!(!r.hw.pump_ever_on());
    assert!(r.sink.contains(&AppEvent::CycleCompleted(CycleOutcome::TimedOut)));
    assert_eq!(r.link.stats().stale, 1);
}

#[test]
fn each_reply_frame_is_counted_once() {
    let mut r = rig();
    r.step();
    r.receive_reply(LevelStatus::Valid);
    r.step();

    r.press_until_query();
    r.receive_reply(LevelStatus::Valid);
    r.receive_reply(LevelStatus::Invalid);
    r.run_for(1_100);

    assert_eq!(
        r.link.stats(),
        LinkStatsSnapshot {
            accepted: 1,
            overlapped: 1,
            stale: 1,
            ..LinkStatsSnapshot::default()
        }
    );
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn send_failure_ends_cycle_without_actuation() {
    let mut r = rig();
    r.radio.fail = true;
    r.press_until_query();
    r.step();

    assert_eq!(r.state(), ControlState::Idle);
    assert!(r.sink.contains(&AppEvent::RadioSendFailed));
    assert!(r.sink.contains(&AppEvent::CycleCompleted(CycleOutcome::SendFailed)));
    assert!(!r.hw.pump_ever_on());
}

#[test]
fn pump_write_failure_is_reported_and_retried() {
    let mut r = rig();
    r.press_until_query();
    r.hw.fail_pump = true;
    r.receive_reply(LevelStatus::Valid);
    r.step();

    assert_eq!(r.state(), ControlState::Actuating);
    assert!(!r.hw.pump_on());
    assert!(r.sink.contains(&AppEvent::ActuatorFault(ActuatorError::PumpWriteFailed)));

    r.hw.fail_pump = false;
    r.step();
    assert!(r.hw.pump_on());

    r.run_for(1_000);
    assert!(!r.hw.pump_on());
}

#[test]
fn abort_forces_everything_off() {
    let mut r = rig();
    r.press_until_query();
    r.receive_reply(LevelStatus::Valid);
    r.step();
    assert!(r.hw.pump_on());

    r.svc.abort(&mut r.hw, &mut r.sink);
    assert_eq!(r.state(), ControlState::Idle);
    assert!(!r.hw.pump_on());
    assert!(!r.hw.indicator_on());
    assert!(r.sink.contains(&AppEvent::CycleCompleted(CycleOutcome::Aborted)));
    assert!(r.sink.contains(&AppEvent::StateChanged {
        from: NodeState::Control(ControlState::Actuating),
        to: NodeState::Control(ControlState::Idle),
    }));
}

// ── Diagnostics ───────────────────────────────────────────────

#[test]
fn link_stats_are_reported_on_interval() {
    let mut cfg = NodeConfig::default();
    cfg.stats_log_interval_secs = 1;
    let mut r = ControlRig::new(cfg);
    r.run_until(1_000);
    assert!(!r.sink.events.iter().any(|e| matches!(e, AppEvent::LinkStats(_))));
    r.step();
    assert!(r.sink.events.iter().any(|e| matches!(e, AppEvent::LinkStats(_))));
}
