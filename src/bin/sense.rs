//! LevelGuard Sense node — firmware entry point.
//!
//! ```text
//!  ESP-NOW rx ──▶ LINK (SenseLink) ──▶ SenseService ──▶ EspNowRadio
//!                                         │
//!                                   SenseHardware (level switch)
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::info;

use levelguard::adapters::espnow::EspNowRadio;
use levelguard::adapters::hardware::SenseHardware;
use levelguard::adapters::log_sink::LogEventSink;
use levelguard::adapters::time::SystemClock;
use levelguard::app::ports::Clock;
use levelguard::app::sense::SenseService;
use levelguard::config::NodeConfig;
use levelguard::pins;
use levelguard::radio::SenseLink;
use levelguard::sensors::water_level::LevelSwitch;

static LINK: SenseLink = SenseLink::new();

const LOOP_PERIOD_MS: u32 = 1;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("LevelGuard sense v{}", env!("CARGO_PKG_VERSION"));

    let config = NodeConfig::default();
    config.validate()?;

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

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

    // SAFETY: the level switch GPIO is claimed exactly once.
    let mut switch_pin = PinDriver::input(unsafe { AnyIOPin::new(pins::LEVEL_SWITCH_GPIO) })?;
    switch_pin.set_pull(Pull::Up)?;
    let mut hw = SenseHardware::new(LevelSwitch::new(switch_pin));

    let clock = SystemClock::new();
    let mut sink = LogEventSink::new();
    let mut service = SenseService::new(&config, &LINK)?;
    service.start(&mut sink);

    info!("Sense node ready. Entering main loop.");

    loop {
        service.tick(clock.now(), &mut hw, &mut radio, &mut sink);
        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}
