//! EEPROM-backed parameter store.
//!
//! Loads a fixed schema of byte-string fields at boot and rewrites only the
//! slots whose value changed. The header tag doubles as a schema version:
//! a different tag discards every stored value. The header extent guards
//! against appended fields: a field is read back only if the previous record
//! reached the end of its slot, so bytes never written by an older schema
//! are not mistaken for a value.

use log::{debug, info, warn};

use crate::app::ports::{NvMemoryPort, ParamPortal, with_session};
use crate::error::{MediumError, StoreError};

use super::field::FieldValue;
use super::schema::{EXTENT_OFFSET, FieldSpec, HEADER_LEN, Layout, TAG_OFFSET};

/// One schema entry together with its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub spec: FieldSpec,
    pub value: FieldValue,
}

/// Versioned parameter record on a non-volatile medium, mirrored into a
/// configuration portal.
pub struct ParamStore<M, P> {
    medium: M,
    portal: P,
    format_tag: u16,
    layout: Layout,
    fields: Vec<Field>,
}

impl<M: NvMemoryPort, P: ParamPortal> ParamStore<M, P> {
    /// Load (or create) the record described by `schema` and register every
    /// field with `portal`.
    ///
    /// A stored tag different from `format_tag` means "no prior data": every
    /// field starts empty. Medium failures are returned unchanged.
    pub fn init(
        mut medium: M,
        format_tag: u16,
        schema: &[FieldSpec],
        mut portal: P,
    ) -> Result<Self, StoreError> {
        let layout = Layout::new(schema)?;
        let fields = with_session(&mut medium, layout.record_len(), |m| {
            load_record(m, format_tag, schema, &layout)
        })?;

        info!(
            "ParamStore: {} fields, {} bytes, tag=0x{:04x}",
            fields.len(),
            layout.record_len(),
            format_tag
        );

        for (index, field) in fields.iter().enumerate() {
            portal.add_field(index, &field.spec, field.value.as_bytes());
        }

        Ok(Self {
            medium,
            portal,
            format_tag,
            layout,
            fields,
        })
    }

    /// Current value of field `index`, or `None` if out of range.
    pub fn get_setting(&self, index: usize) -> Option<&[u8]> {
        self.fields.get(index).map(|f| f.value.as_bytes())
    }

    /// Current value of field `index` as text; `None` if out of range or not
    /// valid UTF-8.
    pub fn get_setting_str(&self, index: usize) -> Option<&str> {
        self.fields.get(index).and_then(|f| f.value.as_str())
    }

    /// Replace field `index` and persist immediately.
    ///
    /// Returns `Ok(false)` without touching the medium when `index` is out
    /// of range. The value is cut at the first NUL and at field capacity.
    pub fn set_setting(&mut self, index: usize, value: &[u8]) -> Result<bool, StoreError> {
        let Some(field) = self.fields.get_mut(index) else {
            return Ok(false);
        };
        field.value.set(value);
        self.portal.update_field(index, field.value.as_bytes());
        self.persist()?;
        Ok(true)
    }

    /// Apply the portal's saved edit session, if there is one, and persist.
    ///
    /// Returns `Ok(false)` when the user has not saved anything since the
    /// last call. Edits naming an unknown field are skipped.
    pub fn apply_portal_edits(&mut self) -> Result<bool, StoreError> {
        let Some(edits) = self.portal.take_saved() else {
            return Ok(false);
        };
        info!("ParamStore: applying {} portal edit(s)", edits.len());

        for edit in &edits {
            match self.fields.get_mut(edit.index) {
                Some(field) => {
                    field.value.set(&edit.value);
                    self.portal.update_field(edit.index, field.value.as_bytes());
                }
                None => warn!("ParamStore: ignoring edit for field {}", edit.index),
            }
        }
        self.persist()?;
        Ok(true)
    }

    /// Schema index of the field with identifier `id`.
    pub fn find(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.spec.id == id)
    }

    /// Write every field whose stored value differs from memory.
    ///
    /// Returns the number of slots rewritten; zero means the medium saw no
    /// writes at all.
    pub fn persist(&mut self) -> Result<usize, StoreError> {
        let fields = &self.fields;
        let offsets = self.layout.offsets();
        let updated = with_session(&mut self.medium, self.layout.record_len(), |m| {
            let widest = widest_slot(fields.iter().map(|f| &f.spec));
            let mut stored = vec![0u8; widest];
            let mut image = vec![0u8; widest];
            let mut updated = 0;

            for (field, &offset) in fields.iter().zip(offsets) {
                let cap = field.spec.capacity();
                m.read_at(offset, &mut stored[..cap])?;
                if slot_value(&stored[..cap]) != field.value.as_bytes() {
                    field.value.write_slot(&mut image[..cap]);
                    m.write_at(offset, &image[..cap])?;
                    debug!("ParamStore: updated '{}'", field.spec.id);
                    updated += 1;
                }
            }
            Ok(updated)
        })?;

        if updated > 0 {
            info!("ParamStore: persisted {} field(s)", updated);
        }
        Ok(updated)
    }

    /// Empty every field and persist (factory reset).
    pub fn reset_all(&mut self) -> Result<usize, StoreError> {
        for (index, field) in self.fields.iter_mut().enumerate() {
            field.value.clear();
            self.portal.update_field(index, field.value.as_bytes());
        }
        warn!("ParamStore: all fields reset");
        self.persist()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn format_tag(&self) -> u16 {
        self.format_tag
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn portal(&self) -> &P {
        &self.portal
    }

    /// Portal access for the UI layer (submitting and saving edits).
    pub fn portal_mut(&mut self) -> &mut P {
        &mut self.portal
    }

    /// Release the medium, e.g. to re-initialise against it after a reboot.
    pub fn into_medium(self) -> M {
        self.medium
    }
}

/// Largest slot capacity in `specs`; sizes the scratch buffers.
fn widest_slot<'a>(specs: impl Iterator<Item = &'a FieldSpec>) -> usize {
    specs.map(FieldSpec::capacity).max().unwrap_or(0)
}

/// Stored value of a slot: bytes up to the first NUL.
fn slot_value(slot: &[u8]) -> &[u8] {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    &slot[..end]
}

fn read_u16<M: NvMemoryPort + ?Sized>(medium: &M, offset: usize) -> Result<u16, MediumError> {
    let mut word = [0u8; 2];
    medium.read_at(offset, &mut word)?;
    Ok(u16::from_le_bytes(word))
}

/// Body of the init session: validate the header, load or create each field,
/// then stamp the new header.
fn load_record<M: NvMemoryPort + ?Sized>(
    medium: &mut M,
    format_tag: u16,
    schema: &[FieldSpec],
    layout: &Layout,
) -> Result<Vec<Field>, MediumError> {
    let stored_tag = read_u16(medium, TAG_OFFSET)?;
    let stored_extent = if stored_tag == format_tag {
        read_u16(medium, EXTENT_OFFSET)? as usize
    } else {
        warn!(
            "ParamStore: tag 0x{:04x} != 0x{:04x}, starting empty",
            stored_tag, format_tag
        );
        0
    };

    let mut fields = Vec::with_capacity(schema.len());
    let mut slot = vec![0u8; widest_slot(schema.iter())];

    for (spec, &offset) in schema.iter().zip(layout.offsets()) {
        let cap = spec.capacity();
        let value = if stored_extent >= offset + cap {
            medium.read_at(offset, &mut slot[..cap])?;
            debug!("ParamStore: loaded '{}'", spec.id);
            FieldValue::from_slot(cap, &slot[..cap])
        } else {
            medium.write_at(offset, &[0])?;
            debug!("ParamStore: created '{}'", spec.id);
            FieldValue::empty(cap)
        };
        fields.push(Field { spec: *spec, value });
    }

    let mut header = [0u8; HEADER_LEN];
    header[TAG_OFFSET..TAG_OFFSET + 2].copy_from_slice(&format_tag.to_le_bytes());
    header[EXTENT_OFFSET..EXTENT_OFFSET + 2].copy_from_slice(&layout.extent().to_le_bytes());

    let mut current = [0u8; HEADER_LEN];
    medium.read_at(0, &mut current)?;
    if current != header {
        medium.write_at(0, &header)?;
    }

    Ok(fields)
}
