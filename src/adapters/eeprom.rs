//! In-RAM emulated EEPROM.
//!
//! Implements [`NvMemoryPort`] with the same buffered session model as the
//! flash-backed adapter: `open` copies a window out of the device image,
//! reads and writes address the window, and `commit_and_close` copies it
//! back only if a write actually changed a byte. Bytes beyond the window
//! are never touched.
//!
//! Used as the host simulation backend and as the test double; the wear
//! counters make redundant writes observable.

use crate::app::ports::NvMemoryPort;
use crate::error::MediumError;

/// Value of a never-written EEPROM/flash byte.
pub const ERASED: u8 = 0xFF;

#[derive(Debug, Clone)]
pub struct RamEeprom {
    device: Vec<u8>,
    window: Option<Vec<u8>>,
    dirty: bool,
    byte_writes: usize,
    flushes: usize,
}

impl RamEeprom {
    /// Device of `capacity` erased bytes.
    pub fn new(capacity: usize) -> Self {
        Self::from_bytes(&vec![ERASED; capacity])
    }

    /// Device pre-loaded with `image` (e.g. a dump or fuzz input).
    pub fn from_bytes(image: &[u8]) -> Self {
        Self {
            device: image.to_vec(),
            window: None,
            dirty: false,
            byte_writes: 0,
            flushes: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.device.len()
    }

    /// Committed device contents.
    pub fn contents(&self) -> &[u8] {
        &self.device
    }

    pub fn is_open(&self) -> bool {
        self.window.is_some()
    }

    /// Total bytes passed to `write_at`, whether or not they differed.
    pub fn byte_writes(&self) -> usize {
        self.byte_writes
    }

    /// Number of commits that wrote the window back.
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Zero both wear counters.
    pub fn reset_counters(&mut self) {
        self.byte_writes = 0;
        self.flushes = 0;
    }

    fn range(len: usize, offset: usize, width: usize) -> Result<core::ops::Range<usize>, MediumError> {
        let end = offset.checked_add(width).ok_or(MediumError::OutOfBounds)?;
        if end > len {
            return Err(MediumError::OutOfBounds);
        }
        Ok(offset..end)
    }
}

impl NvMemoryPort for RamEeprom {
    fn open(&mut self, size: usize) -> Result<(), MediumError> {
        if self.window.is_some() {
            return Err(MediumError::AlreadyOpen);
        }
        if size > self.device.len() {
            return Err(MediumError::OutOfBounds);
        }
        self.window = Some(self.device[..size].to_vec());
        self.dirty = false;
        Ok(())
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> Result<(), MediumError> {
        let window = self.window.as_ref().ok_or(MediumError::NotOpen)?;
        let range = Self::range(window.len(), offset, buf.len())?;
        buf.copy_from_slice(&window[range]);
        Ok(())
    }

    fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<(), MediumError> {
        let window = self.window.as_mut().ok_or(MediumError::NotOpen)?;
        let range = Self::range(window.len(), offset, data.len())?;
        self.byte_writes += data.len();
        if window[range.clone()] != *data {
            window[range].copy_from_slice(data);
            self.dirty = true;
        }
        Ok(())
    }

    fn commit_and_close(&mut self) -> Result<(), MediumError> {
        let window = self.window.take().ok_or(MediumError::NotOpen)?;
        if self.dirty {
            self.device[..window.len()].copy_from_slice(&window);
            self.flushes += 1;
            self.dirty = false;
        }
        Ok(())
    }
}
