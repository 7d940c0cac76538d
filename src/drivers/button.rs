//! Polled button driver with short and long press classification.
//!
//! ## Hardware
//!
//! Momentary switch on a GPIO input. With the internal pull-up enabled the
//! line rests high and a press pulls it low (`Polarity::ActiveLow`);
//! otherwise it rests low and a press drives it high. [`ButtonManager::tick`]
//! is called from the main loop at a roughly constant cadence and runs the
//! classification state machine against the sampled level.
//!
//! ## Gesture detection
//!
//! | Gesture     | Condition                       | Event              | Fires        |
//! |-------------|---------------------------------|--------------------|--------------|
//! | Short press | Release before 2s               | `PressEvent::Short`| on release   |
//! | Long press  | Held for 2s or more             | `PressEvent::Long` | while held   |
//! | Long press  | Released after 2s, hold missed  | `PressEvent::Long` | on release   |
//!
//! Exactly one event fires per press cycle. The third row covers a poll
//! cadence so coarse that no sample landed inside the hold window.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::app::ports::{ClockPort, PressHandler};

/// Hold duration that turns a press into a long press.
pub const LONG_PRESS_MS: u32 = 2000;

/// Button events emitted after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressEvent {
    Short,
    Long,
}

impl PressEvent {
    /// `true` for [`PressEvent::Long`].
    pub fn is_long(self) -> bool {
        matches!(self, Self::Long)
    }
}

/// Electrical level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Rests high through a pull-up; pressing pulls the line low.
    ActiveLow,
    /// Rests low; pressing drives the line high.
    ActiveHigh,
}

impl Polarity {
    pub fn from_pull_up(use_internal_pull_up: bool) -> Self {
        if use_internal_pull_up {
            Self::ActiveLow
        } else {
            Self::ActiveHigh
        }
    }

    /// Map a raw level to "pressed" for this polarity.
    pub fn is_pressed(self, level_high: bool) -> bool {
        match self {
            Self::ActiveLow => !level_high,
            Self::ActiveHigh => level_high,
        }
    }
}

/// Observable phase of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierState {
    Idle,
    Pressed,
    LongNotified,
}

/// Pure press classification state machine.
///
/// Knows nothing about pins or clocks: feed it the sampled "pressed" flag
/// and the current time.
#[derive(Debug, Clone)]
pub struct PressClassifier {
    long_press_ms: u32,
    active_since: Option<u32>,
    long_notified: bool,
}

impl Default for PressClassifier {
    fn default() -> Self {
        Self::new(LONG_PRESS_MS)
    }
}

impl PressClassifier {
    pub fn new(long_press_ms: u32) -> Self {
        Self {
            long_press_ms,
            active_since: None,
            long_notified: false,
        }
    }

    pub fn long_press_ms(&self) -> u32 {
        self.long_press_ms
    }

    pub fn state(&self) -> ClassifierState {
        match (self.active_since, self.long_notified) {
            (None, _) => ClassifierState::Idle,
            (Some(_), false) => ClassifierState::Pressed,
            (Some(_), true) => ClassifierState::LongNotified,
        }
    }

    /// Advance the state machine by one sample.
    pub fn update(&mut self, pressed: bool, now_ms: u32) -> Option<PressEvent> {
        match (pressed, self.active_since) {
            (true, None) => {
                self.active_since = Some(now_ms);
                None
            }
            (true, Some(since)) => {
                if !self.long_notified && now_ms.wrapping_sub(since) >= self.long_press_ms {
                    self.long_notified = true;
                    return Some(PressEvent::Long);
                }
                None
            }
            (false, Some(since)) => {
                let event = if self.long_notified {
                    None
                } else if now_ms.wrapping_sub(since) >= self.long_press_ms {
                    Some(PressEvent::Long)
                } else {
                    Some(PressEvent::Short)
                };
                self.active_since = None;
                self.long_notified = false;
                event
            }
            (false, None) => None,
        }
    }
}

/// Button on a GPIO input, sampled by [`tick`](Self::tick).
pub struct ButtonManager<P, C> {
    pin: P,
    clock: C,
    polarity: Polarity,
    classifier: PressClassifier,
    handler: Option<Box<dyn PressHandler>>,
}

impl<P, C> ButtonManager<P, C>
where
    P: InputPin,
    C: ClockPort,
{
    /// `use_internal_pull_up` selects [`Polarity::ActiveLow`]; the pin itself
    /// must already be configured with the matching pull resistor.
    pub fn new(pin: P, clock: C, use_internal_pull_up: bool) -> Self {
        Self {
            pin,
            clock,
            polarity: Polarity::from_pull_up(use_internal_pull_up),
            classifier: PressClassifier::default(),
            handler: None,
        }
    }

    /// Override the long-press threshold.
    #[must_use]
    pub fn with_long_press_ms(mut self, long_press_ms: u32) -> Self {
        self.classifier = PressClassifier::new(long_press_ms);
        self
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn state(&self) -> ClassifierState {
        self.classifier.state()
    }

    /// Register the press handler, replacing any previous one.
    pub fn on_press<H>(&mut self, handler: H)
    where
        H: PressHandler + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Drop the registered handler; subsequent events are discarded.
    pub fn clear_handler(&mut self) {
        self.handler = None;
    }

    /// `true` if the current pin level means "pressed". A failed read counts
    /// as released.
    pub fn is_pressed(&mut self) -> bool {
        self.sample().unwrap_or(false)
    }

    /// Sample the pin once and run the classifier. Call from the main loop.
    pub fn tick(&mut self) {
        let Some(pressed) = self.sample() else {
            return;
        };
        let now_ms = self.clock.now_ms();

        if let Some(event) = self.classifier.update(pressed, now_ms) {
            debug!("Button: {:?} press at {} ms", event, now_ms);
            if let Some(handler) = self.handler.as_mut() {
                handler.on_press(event);
            }
        }
    }

    fn sample(&mut self) -> Option<bool> {
        match self.pin.is_high() {
            Ok(high) => Some(self.polarity.is_pressed(high)),
            Err(e) => {
                warn!("Button: pin read failed ({:?}), sample skipped", e);
                None
            }
        }
    }
}
