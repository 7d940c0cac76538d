//! Device configuration parameters.
//!
//! Build-time tunables for the button driver and the parameter store.
//! User-editable settings (network credentials, controller address) live in
//! the [`ParamStore`](crate::params::ParamStore), not here.

use serde::{Deserialize, Serialize};

use crate::drivers::button::LONG_PRESS_MS;
use crate::error::Error;
use crate::pins;

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Button ---
    /// GPIO number of the push button
    pub button_gpio: i32,
    /// Enable the internal pull-up (button is active low)
    pub button_pull_up: bool,
    /// Hold time that classifies a press as long (milliseconds)
    pub long_press_ms: u32,

    // --- Timing ---
    /// Main loop poll interval (milliseconds)
    pub poll_interval_ms: u32,

    // --- Storage ---
    /// Parameter record format tag; change it when the schema is reordered
    pub param_format_tag: u16,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Button
            button_gpio: pins::BUTTON_GPIO,
            button_pull_up: true,
            long_press_ms: LONG_PRESS_MS,

            // Timing
            poll_interval_ms: 20, // 50 Hz

            // Storage
            param_format_tag: 0xFA01,
        }
    }
}

impl DeviceConfig {
    /// Reject values that would make the button unusable.
    pub fn validate(&self) -> Result<(), Error> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be > 0"));
        }
        if self.long_press_ms <= self.poll_interval_ms {
            return Err(Error::Config(
                "long_press_ms must be longer than poll_interval_ms",
            ));
        }
        if !(0..=48).contains(&self.button_gpio) {
            return Err(Error::Config("button_gpio must be 0-48"));
        }
        Ok(())
    }
}
