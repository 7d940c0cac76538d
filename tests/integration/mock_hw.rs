//! Mock hardware for integration tests.
//!
//! Every mock shares its state through `Rc<Cell<_>>` so a test can keep a
//! handle and drive the pin, the clock or the medium while the component
//! under test owns its own copy.

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use plugcore::adapters::eeprom::RamEeprom;
use plugcore::app::ports::{ClockPort, NvMemoryPort};
use plugcore::drivers::button::{ButtonManager, PressEvent};
use plugcore::error::MediumError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// ── Digital input ─────────────────────────────────────────────

#[derive(Debug)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Input pin whose level (and read failures) are set by the test.
#[derive(Clone, Default)]
pub struct ScriptedPin {
    high: Rc<Cell<bool>>,
    failing: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl ScriptedPin {
    pub fn new(high: bool) -> Self {
        let pin = Self::default();
        pin.high.set(high);
        pin
    }

    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl ErrorType for ScriptedPin {
    type Error = PinFault;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, PinFault> {
        if self.failing.get() {
            return Err(PinFault);
        }
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, PinFault> {
        self.is_high().map(|h| !h)
    }
}

// ── Clock ─────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u32>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

// ── Press recording ───────────────────────────────────────────

#[derive(Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<PressEvent>>>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn handler(&self) -> impl FnMut(PressEvent) + 'static {
        let events = Rc::clone(&self.events);
        move |event| events.borrow_mut().push(event)
    }

    pub fn events(&self) -> Vec<PressEvent> {
        self.events.borrow().clone()
    }
}

/// Button wired to a scripted pin, a manual clock and an event log.
pub struct ButtonRig {
    pub button: ButtonManager<ScriptedPin, ManualClock>,
    pub pin: ScriptedPin,
    pub clock: ManualClock,
    pub log: EventLog,
    pull_up: bool,
}

#[allow(dead_code)]
impl ButtonRig {
    pub fn new(pull_up: bool) -> Self {
        let pin = ScriptedPin::new(pull_up);
        let clock = ManualClock::default();
        let log = EventLog::default();
        let mut button = ButtonManager::new(pin.clone(), clock.clone(), pull_up);
        button.on_press(log.handler());
        Self {
            button,
            pin,
            clock,
            log,
            pull_up,
        }
    }

    pub fn press(&self) {
        self.pin.set_high(!self.pull_up);
    }

    pub fn release(&self) {
        self.pin.set_high(self.pull_up);
    }

    pub fn tick_at(&mut self, ms: u32) {
        self.clock.set(ms);
        self.button.tick();
    }

    /// Hold the button from `from` to `to`, sampling every `step` ms, then
    /// release at `to`.
    pub fn hold(&mut self, from: u32, to: u32, step: u32) {
        self.press();
        let mut t = from;
        while t < to {
            self.tick_at(t);
            t += step;
        }
        self.release();
        self.tick_at(to);
    }

    pub fn events(&self) -> Vec<PressEvent> {
        self.log.events()
    }
}

// ── Faulty medium ─────────────────────────────────────────────

/// Shared fault switches for [`FaultyEeprom`].
#[derive(Clone, Default)]
pub struct Faults {
    pub fail_open: Rc<Cell<bool>>,
    pub fail_commit: Rc<Cell<bool>>,
    pub closes: Rc<Cell<usize>>,
}

/// Wraps [`RamEeprom`] and injects open / commit failures.
pub struct FaultyEeprom {
    pub inner: RamEeprom,
    faults: Faults,
}

#[allow(dead_code)]
impl FaultyEeprom {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RamEeprom::new(capacity),
            faults: Faults::default(),
        }
    }

    /// Handle for flipping faults while the store owns the medium.
    pub fn faults(&self) -> Faults {
        self.faults.clone()
    }
}

impl NvMemoryPort for FaultyEeprom {
    fn open(&mut self, size: usize) -> Result<(), MediumError> {
        if self.faults.fail_open.get() {
            return Err(MediumError::Unavailable(-1));
        }
        self.inner.open(size)
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<(), MediumError> {
        self.inner.read_at(offset, buf)
    }

    fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<(), MediumError> {
        self.inner.write_at(offset, data)
    }

    fn commit_and_close(&mut self) -> Result<(), MediumError> {
        self.faults.closes.set(self.faults.closes.get() + 1);
        if self.faults.fail_commit.get() {
            // End the session but drop the window, like a failed flash write.
            let before = self.inner.contents().to_vec();
            self.inner.commit_and_close()?;
            self.inner = RamEeprom::from_bytes(&before);
            return Err(MediumError::CommitFailed(-2));
        }
        self.inner.commit_and_close()
    }
}
