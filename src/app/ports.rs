//! Port traits — the boundary between the firmware core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ButtonManager / ParamStore
//! ```
//!
//! Driven adapters (clock, EEPROM, configuration portal, event handlers)
//! implement these traits. The core consumes them via generics or trait
//! objects, so it never touches hardware directly and can be exercised on
//! the host against in-memory fakes.
//!
//! The digital input is not listed here: the button driver takes any
//! [`embedded_hal::digital::InputPin`].

use crate::drivers::button::PressEvent;
use crate::error::MediumError;
use crate::params::schema::FieldSpec;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: hardware timer → core)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
///
/// The value may wrap at `u32::MAX`; consumers compute elapsed time with
/// `wrapping_sub`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Non-volatile memory port (driven adapter: core ↔ EEPROM / flash)
// ───────────────────────────────────────────────────────────────

/// Byte-addressable non-volatile memory with a buffered session model.
///
/// A session starts with [`open`](Self::open), which maps the first `size`
/// bytes of the device into a working window. Reads and writes address that
/// window. [`commit_and_close`](Self::commit_and_close) writes the window
/// back and ends the session.
///
/// # Contract
///
/// - `write_at` must not disturb bytes outside `offset..offset + data.len()`.
/// - Commit writes the whole window back in one operation. Whether that is
///   atomic across the window is a property of the backing device.
/// - Every `open` must be matched by `commit_and_close` on every exit path;
///   use [`with_session`] rather than calling the pair by hand.
pub trait NvMemoryPort {
    /// Start a session covering bytes `0..size`.
    fn open(&mut self, size: usize) -> Result<(), MediumError>;

    /// Fill `buf` with the bytes at `offset..offset + buf.len()`.
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<(), MediumError>;

    /// Overwrite the bytes at `offset..offset + data.len()`.
    fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<(), MediumError>;

    /// Persist the window and end the session.
    fn commit_and_close(&mut self) -> Result<(), MediumError>;
}

/// Open `medium`, run `f`, then always commit and close.
///
/// The closure's error takes precedence over a commit error; if the closure
/// succeeds, a commit failure is returned instead of its value.
pub fn with_session<M, F, T>(medium: &mut M, size: usize, f: F) -> Result<T, MediumError>
where
    M: NvMemoryPort + ?Sized,
    F: FnOnce(&mut M) -> Result<T, MediumError>,
{
    medium.open(size)?;
    let result = f(medium);
    let closed = medium.commit_and_close();
    let value = result?;
    closed?;
    Ok(value)
}

// ───────────────────────────────────────────────────────────────
// Press handler (driven adapter: core → application)
// ───────────────────────────────────────────────────────────────

/// Receiver for classified button presses.
///
/// Invoked synchronously from inside
/// [`ButtonManager::tick`](crate::drivers::button::ButtonManager::tick).
pub trait PressHandler {
    fn on_press(&mut self, event: PressEvent);
}

impl<F> PressHandler for F
where
    F: FnMut(PressEvent),
{
    fn on_press(&mut self, event: PressEvent) {
        self(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration portal (driving adapter: user ↔ parameter store)
// ───────────────────────────────────────────────────────────────

/// One edited value delivered by the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    /// Schema index of the edited field.
    pub index: usize,
    pub value: Vec<u8>,
}

impl FieldEdit {
    pub fn new(index: usize, value: &[u8]) -> Self {
        Self {
            index,
            value: value.to_vec(),
        }
    }
}

/// The parameter-presentation collaborator (e.g. a captive configuration
/// portal) that lets a user edit stored fields.
///
/// [`ParamStore`](crate::params::ParamStore) owns its portal: it registers
/// every field at init, reports each value change, and pulls finished edit
/// sessions when the host loop asks it to.
pub trait ParamPortal {
    /// Register one schema field together with its current value.
    fn add_field(&mut self, index: usize, spec: &FieldSpec, value: &[u8]);

    /// The in-memory value of field `index` is now `value`.
    fn update_field(&mut self, index: usize, value: &[u8]);

    /// Edits of a session the user saved since the last call, if any.
    fn take_saved(&mut self) -> Option<Vec<FieldEdit>>;
}
