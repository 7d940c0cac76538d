//! In-memory value of one stored field.

/// Capacity-bounded byte value with explicit length.
///
/// A value never holds a NUL byte: NUL terminates the value in the stored
/// slot, so anything after it would not survive a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    capacity: usize,
    bytes: Vec<u8>,
}

impl FieldValue {
    /// Empty value with room for `capacity` bytes.
    pub fn empty(capacity: usize) -> Self {
        Self {
            capacity,
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Value decoded from a stored slot: bytes up to the first NUL.
    pub fn from_slot(capacity: usize, slot: &[u8]) -> Self {
        let mut value = Self::empty(capacity);
        value.set(slot);
        value
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The value as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    /// Replace the value, cut at the first NUL and at capacity.
    pub fn set(&mut self, value: &[u8]) {
        let end = value
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(value.len())
            .min(self.capacity);
        self.bytes.clear();
        self.bytes.extend_from_slice(&value[..end]);
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Write the slot image (value followed by zero padding) into `out`.
    ///
    /// `out` must be exactly `capacity` bytes long.
    pub fn write_slot(&self, out: &mut [u8]) {
        let len = self.bytes.len();
        out[..len].copy_from_slice(&self.bytes);
        out[len..].fill(0);
    }
}
