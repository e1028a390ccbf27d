//! LevelGuard Control node — firmware entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  button ISR ──▶ BUTTON (ButtonLatch)                         │
//! │  ESP-NOW rx ──▶ LINK (ControlLink)                           │
//! │                         │                                    │
//! │  ───────────── Port Trait Boundary ──────────────            │
//! │                         ▼                                    │
//! │   ┌────────────────────────────────────────────┐             │
//! │   │  ControlService: debounce · FSM · outputs  │             │
//! │   └────────────────────────────────────────────┘             │
//! │        │                  │                 │                │
//! │  ControlHardware     EspNowRadio      LogEventSink           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, InterruptType, PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::info;

use levelguard::adapters::espnow::EspNowRadio;
use levelguard::adapters::hardware::ControlHardware;
use levelguard::adapters::log_sink::LogEventSink;
use levelguard::adapters::time::SystemClock;
use levelguard::app::control::ControlService;
use levelguard::app::ports::Clock;
use levelguard::config::NodeConfig;
use levelguard::drivers::button::ButtonLatch;
use levelguard::drivers::pump::Pump;
use levelguard::drivers::status_led::Indicator;
use levelguard::pins;
use levelguard::radio::ControlLink;

static BUTTON: ButtonLatch = ButtonLatch::new(pins::BUTTON_MASK);
static LINK: ControlLink = ControlLink::new();

const LOOP_PERIOD_MS: u32 = 1;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("LevelGuard control v{}", env!("CARGO_PKG_VERSION"));

    let config = NodeConfig::default();
    config.validate()?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 2. Radio ──────────────────────────────────────────────
    // ESP-NOW needs the Wi-Fi driver running; no association.
    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
    wifi.start()?;

    let mut radio = EspNowRadio::new(None)?;
    radio.on_receive(|frame| {
        LINK.on_packet_received(frame);
    })?;

    // ── 3. Outputs (driven low before anything else runs) ─────
    // SAFETY: each GPIO number in the board map is claimed exactly once.
    let pump = Pump::new(PinDriver::output(unsafe { AnyOutputPin::new(pins::PUMP_GPIO) })?)?;
    let indicator =
        Indicator::new(PinDriver::output(unsafe { AnyOutputPin::new(pins::INDICATOR_GPIO) })?)?;
    let mut hw = ControlHardware::new(pump, indicator);

    // ── 4. Button ─────────────────────────────────────────────
    // SAFETY: as above.
    let mut button = PinDriver::input(unsafe { AnyIOPin::new(pins::BUTTON_GPIO) })?;
    button.set_pull(Pull::Up)?;
    button.set_interrupt_type(InterruptType::NegEdge)?;
    let isr_clock = SystemClock::new();
    // SAFETY: the callback only touches atomics and the ISR-safe timer.
    unsafe {
        button.subscribe(move || {
            BUTTON.on_port_interrupt(pins::BUTTON_MASK, isr_clock.uptime_ms_u32());
        })?;
    }
    button.enable_interrupt()?;

    // ── 5. Service ────────────────────────────────────────────
    let clock = SystemClock::new();
    let mut sink = LogEventSink::new();
    let mut service = ControlService::new(&config, &BUTTON, &LINK)?;
    service.start(&mut hw, &mut sink);

    info!("Control node ready. Entering main loop.");

    // ── 6. Main loop ──────────────────────────────────────────
    loop {
        service.tick(clock.now(), &mut hw, &mut radio, &mut sink);

        // The driver disarms the GPIO interrupt after every edge.
        if BUTTON.is_enabled() {
            button.enable_interrupt()?;
        }

        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}
