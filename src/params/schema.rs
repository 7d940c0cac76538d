//! Field schema and the fixed record layout derived from it.
//!
//! ```text
//!  offset 0      2      4                4+len0           4+len0+len1
//!         ┌──────┬──────┬────────────────┬────────────────┬─────
//!         │ tag  │extent│ field 0        │ field 1        │ ...
//!         └──────┴──────┴────────────────┴────────────────┴─────
//! ```
//!
//! Both header words are little-endian. `extent` is the end offset of the
//! last field, i.e. header plus the sum of all capacities.

use crate::error::SchemaError;

/// Header size: 16-bit format tag followed by 16-bit record extent.
pub const HEADER_LEN: usize = 4;

pub(crate) const TAG_OFFSET: usize = 0;
pub(crate) const EXTENT_OFFSET: usize = 2;

/// Schema entry for one stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Stable identifier, used as the form field name.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Slot capacity in bytes.
    pub max_len: u16,
    /// Opaque presentation hint for the portal (e.g. `type="password"`).
    pub render_hint: &'static str,
}

impl FieldSpec {
    pub const fn new(id: &'static str, label: &'static str, max_len: u16) -> Self {
        Self {
            id,
            label,
            max_len,
            render_hint: "",
        }
    }

    #[must_use]
    pub const fn with_render_hint(mut self, render_hint: &'static str) -> Self {
        self.render_hint = render_hint;
        self
    }

    pub fn capacity(&self) -> usize {
        self.max_len as usize
    }
}

/// Offsets of every field for one schema ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    offsets: Vec<usize>,
    data_len: usize,
}

impl Layout {
    /// Validate `schema` and compute field offsets.
    ///
    /// An empty schema is a header-only record.
    pub fn new(schema: &[FieldSpec]) -> Result<Self, SchemaError> {
        let mut offsets = Vec::with_capacity(schema.len());
        let mut cursor = HEADER_LEN;
        for spec in schema {
            // A zero-width slot would share its offset with the next field.
            if spec.max_len == 0 {
                return Err(SchemaError::ZeroCapacity(spec.id));
            }
            offsets.push(cursor);
            cursor += spec.capacity();
        }

        if cursor > u16::MAX as usize {
            return Err(SchemaError::TooLarge);
        }

        Ok(Self {
            offsets,
            data_len: cursor - HEADER_LEN,
        })
    }

    /// Byte offset of field `index`.
    pub fn offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied()
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Sum of all field capacities.
    pub fn data_len(&self) -> usize {
        self.data_len
    }

    /// Header plus data; the size every medium session is opened with.
    pub fn record_len(&self) -> usize {
        HEADER_LEN + self.data_len
    }

    /// Value written to the header's extent word.
    pub fn extent(&self) -> u16 {
        self.record_len() as u16
    }
}
