//! Talkback controller firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspButton      GpioLed       WifiStation     LogEventSink     │
//! │  (ButtonInput)  (LedOutput)   (NetworkPort)   (EventSink)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          DeviceController (pure logic)                 │    │
//! │  │  Mode · Debounce · LED guard · Console session         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  runtime: LocalExecutor · async-io-mini reactor · UDP link     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info, warn};

use talkback::adapters::hardware::{EspButton, GpioLed};
use talkback::adapters::log_sink::LogEventSink;
use talkback::adapters::wifi::WifiStation;
use talkback::config::TalkbackConfig;
use talkback::error::Error;
use talkback::runtime;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("Talkback v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config ─────────────────────────────────────────────
    let config = match TalkbackConfig::load() {
        Ok(c) => c,
        Err(e) => {
            warn!("{}, running with defaults", e);
            TalkbackConfig::default()
        }
    };

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()
        .inspect_err(|e| warn!("NVS unavailable ({}), WiFi calibration not cached", e))
        .ok();

    // Button to ground on GPIO9 (the BOOT strap on most dev boards),
    // LED on GPIO2.
    let button = EspButton::new(peripherals.pins.gpio9).map_err(Error::from)?;
    let led = GpioLed::new(PinDriver::output(peripherals.pins.gpio2)?);
    let network = WifiStation::new(
        peripherals.modem,
        sysloop,
        nvs,
        &config.wifi_ssid,
        &config.wifi_password,
    )
    .map_err(Error::from)?;

    // ── 4. Run forever ────────────────────────────────────────
    if let Err(e) = runtime::run(&config, button, led, network, LogEventSink::new()) {
        error!("runtime exited: {}", e);
        return Err(e.into());
    }
    Ok(())
}
