//! Test rigs: one service plus its mocks and a millisecond clock.
//!
//! The interrupt-shared latch and links are leaked so the service can
//! borrow them for `'static`, the way the firmware's statics are.

use embassy_time::Instant;

use levelguard::app::control::ControlService;
use levelguard::app::sense::SenseService;
use levelguard::config::NodeConfig;
use levelguard::drivers::button::ButtonLatch;
use levelguard::fsm::control::ControlState;
use levelguard::fsm::sense::SenseState;
use levelguard::protocol::{LevelStatus, Packet};
use levelguard::radio::{ControlLink, SenseLink};

use super::mock_hw::{MockHardware, MockRadio, MockSwitch, RecordingSink};

pub const BUTTON_MASK: u32 = 1 << 9;

// ── Control ───────────────────────────────────────────────────

pub struct ControlRig {
    pub latch: &'static ButtonLatch,
    pub link: &'static ControlLink,
    pub svc: ControlService<'static>,
    pub hw: MockHardware,
    pub radio: MockRadio,
    pub sink: RecordingSink,
    pub now_ms: u64,
}

#[allow(dead_code)]
impl ControlRig {
    pub fn new(config: NodeConfig) -> Self {
        let latch: &'static ButtonLatch = Box::leak(Box::new(ButtonLatch::new(BUTTON_MASK)));
        let link: &'static ControlLink = Box::leak(Box::new(ControlLink::new()));
        let mut svc = ControlService::new(&config, latch, link).expect("valid config");
        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::new();
        svc.start(&mut hw, &mut sink);
        Self {
            latch,
            link,
            svc,
            hw,
            radio: MockRadio::new(),
            sink,
            now_ms: 0,
        }
    }

    pub fn state(&self) -> ControlState {
        self.svc.state()
    }

    /// Advance the clock by 1 ms and run one tick.
    pub fn step(&mut self) {
        self.now_ms += 1;
        self.svc.tick(
            Instant::from_millis(self.now_ms),
            &mut self.hw,
            &mut self.radio,
            &mut self.sink,
        );
    }

    /// Tick every millisecond up to and including `ms`.
    pub fn run_until(&mut self, ms: u64) {
        while self.now_ms < ms {
            self.step();
        }
    }

    pub fn run_for(&mut self, ms: u64) {
        self.run_until(self.now_ms + ms);
    }

    /// Falling edge on the button pin, as the GPIO ISR would record it.
    pub fn edge(&self) {
        self.latch.on_port_interrupt(BUTTON_MASK, self.now_ms as u32);
    }

    /// Press and tick until the query is out. Returns the send time.
    pub fn press_until_query(&mut self) -> u64 {
        self.edge();
        for _ in 0..100 {
            self.step();
            if self.state() == ControlState::QueryInFlight {
                return self.now_ms;
            }
        }
        panic!("no query within 100 ms of press, state {:?}", self.state());
    }

    /// Deliver a reply frame to the receive handler.
    pub fn receive_reply(&self, level: LevelStatus) {
        self.link.on_packet_received(&Packet::reply(level).to_bytes());
    }
}

// ── Sense ─────────────────────────────────────────────────────

pub struct SenseRig {
    pub link: &'static SenseLink,
    pub svc: SenseService<'static>,
    pub switch: MockSwitch,
    pub radio: MockRadio,
    pub sink: RecordingSink,
    pub now_ms: u64,
}

#[allow(dead_code)]
impl SenseRig {
    pub fn new(config: NodeConfig, level: LevelStatus) -> Self {
        let link: &'static SenseLink = Box::leak(Box::new(SenseLink::new()));
        let mut svc = SenseService::new(&config, link).expect("valid config");
        let mut sink = RecordingSink::new();
        svc.start(&mut sink);
        Self {
            link,
            svc,
            switch: MockSwitch::new(level),
            radio: MockRadio::new(),
            sink,
            now_ms: 0,
        }
    }

    pub fn state(&self) -> SenseState {
        self.svc.state()
    }

    pub fn step(&mut self) {
        self.now_ms += 1;
        self.svc.tick(
            Instant::from_millis(self.now_ms),
            &mut self.switch,
            &mut self.radio,
            &mut self.sink,
        );
    }

    pub fn run_until(&mut self, ms: u64) {
        while self.now_ms < ms {
            self.step();
        }
    }

    pub fn run_for(&mut self, ms: u64) {
        self.run_until(self.now_ms + ms);
    }

    pub fn receive(&self, frame: &[u8]) {
        self.link.on_packet_received(frame);
    }

    pub fn receive_query(&self) {
        self.receive(&Packet::query().to_bytes());
    }
}
