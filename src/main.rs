//! Smart-plug firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  PinDriver     SystemClock   NvsEeprom     FormPortal    │
//! │  (InputPin)    (ClockPort)   (NvMemory)    (ParamPortal) │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ──────────────      │
//! │                                                          │
//! │     ButtonManager                ParamStore              │
//! │     (press classifier)           (versioned record)      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, PinDriver, Pull};
use log::{info, warn};

use plugcore::adapters::nvs::NvsEeprom;
use plugcore::adapters::portal::FormPortal;
use plugcore::adapters::time::SystemClock;
use plugcore::config::DeviceConfig;
use plugcore::drivers::button::{ButtonManager, PressEvent};
use plugcore::params::{FieldSpec, ParamStore};

/// Emulated EEPROM size; leaves room for fields appended later.
const EEPROM_SIZE: usize = 512;

const PLUG_SCHEMA: [FieldSpec; 4] = [
    FieldSpec::new("name", "Device name", 32),
    FieldSpec::new("ctrl_host", "Controller host", 64),
    FieldSpec::new("ctrl_user", "Controller user", 32),
    FieldSpec::new("ctrl_pass", "Controller password", 64)
        .with_render_hint("type=\"password\""),
];

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("plugcore v{}", env!("CARGO_PKG_VERSION"));

    let config = DeviceConfig::default();
    config.validate()?;

    // ── 2. Parameter store ────────────────────────────────────
    let medium = NvsEeprom::new(EEPROM_SIZE)?;
    let mut store = ParamStore::init(
        medium,
        config.param_format_tag,
        &PLUG_SCHEMA,
        FormPortal::new(),
    )?;
    if let Some(name) = store.find("name").and_then(|i| store.get_setting_str(i)) {
        info!("Device name: '{}'", name);
    }

    // ── 3. Button ─────────────────────────────────────────────
    // SAFETY: the button GPIO is claimed exactly once, here.
    let pin = unsafe { AnyIOPin::new(config.button_gpio) };
    let mut pin = PinDriver::input(pin)?;
    if config.button_pull_up {
        pin.set_pull(Pull::Up)?;
    }
    let mut button = ButtonManager::new(pin, SystemClock::new(), config.button_pull_up)
        .with_long_press_ms(config.long_press_ms);

    let last_press = Rc::new(Cell::new(None));
    let sink = Rc::clone(&last_press);
    button.on_press(move |event: PressEvent| sink.set(Some(event)));

    // ── 4. Main loop ──────────────────────────────────────────
    info!("Entering main loop ({} ms poll)", config.poll_interval_ms);
    loop {
        button.tick();

        match last_press.take() {
            Some(PressEvent::Short) => info!("Relay toggle requested"),
            Some(PressEvent::Long) => info!("Configuration portal requested"),
            None => {}
        }

        if let Err(e) = store.apply_portal_edits() {
            warn!("Saving parameters failed: {}", e);
        }

        FreeRtos::delay_ms(config.poll_interval_ms);
    }
}
