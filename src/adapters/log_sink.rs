//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one `TAG | key=value` line per
//! application event through the `log` facade (UART / USB-CDC on target).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => info!("START | initial_state={:?}", state),
            AppEvent::StateChanged { from, to } => info!("STATE | {:?} -> {:?}", from, to),
            AppEvent::ButtonPressed => info!("BUTTON | press"),
            AppEvent::QuerySent => info!("RADIO | tx=query"),
            AppEvent::ReplyReceived(level) => info!("RADIO | rx=reply level={:?}", level),
            AppEvent::ReplyTimedOut { waited_ms } => {
                warn!("RADIO | reply timeout waited_ms={}", waited_ms);
            }
            AppEvent::PumpStarted => info!("PUMP | on"),
            AppEvent::PumpStopped => info!("PUMP | off"),
            AppEvent::CycleCompleted(outcome) => info!("CYCLE | outcome={:?}", outcome),
            AppEvent::RequestAccepted(level) => info!("RADIO | rx=query level={:?}", level),
            AppEvent::ReplySent(level) => info!("RADIO | tx=reply level={:?}", level),
            AppEvent::RequestDropped => warn!("RADIO | query dropped (busy)"),
            AppEvent::RadioSendFailed => warn!("RADIO | send failed"),
            AppEvent::ActuatorFault(e) => warn!("FAULT | actuator: {}", e),
            AppEvent::SensorFault(e) => warn!("FAULT | sensor: {}", e),
            AppEvent::LinkStats(s) => info!(
                "LINK | accepted={} malformed={} ignored={} overlapped={} stale={}",
                s.accepted, s.malformed, s.ignored_opcode, s.overlapped, s.stale
            ),
        }
    }
}
