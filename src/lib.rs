//! Smart-plug firmware core.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection: the polled button classifier and the versioned EEPROM
//! parameter store, plus the adapters that bind them to hardware. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod params;

mod pins;
