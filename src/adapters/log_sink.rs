//! Log-based press handler.
//!
//! Implements [`PressHandler`] by writing classified presses to the
//! logger (UART / USB-CDC in production). Useful as the default handler
//! before the application installs its own.

use log::info;

use crate::app::ports::PressHandler;
use crate::drivers::button::PressEvent;

/// Handler that logs every [`PressEvent`] and counts them.
#[derive(Debug, Default)]
pub struct LogPressHandler {
    short: u32,
    long: u32,
}

impl LogPressHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn short_count(&self) -> u32 {
        self.short
    }

    pub fn long_count(&self) -> u32 {
        self.long
    }
}

impl PressHandler for LogPressHandler {
    fn on_press(&mut self, event: PressEvent) {
        match event {
            PressEvent::Short => {
                self.short = self.short.wrapping_add(1);
                info!("BUTTON | short press (#{})", self.short);
            }
            PressEvent::Long => {
                self.long = self.long.wrapping_add(1);
                info!("BUTTON | long press (#{})", self.long);
            }
        }
    }
}
