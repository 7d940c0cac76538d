//! Configuration portal adapters.
//!
//! [`FormPortal`] is the in-memory model of the captive configuration form.
//! The store registers each field with its current value and reports every
//! later change through [`ParamPortal::update_field`], so the form always
//! shows what the store holds. The HTTP layer (not part of this crate)
//! stages user input with [`FormPortal::submit`] and finishes the session
//! with [`FormPortal::save`] or [`FormPortal::discard`]; the main loop then
//! calls [`ParamStore::apply_portal_edits`](crate::params::ParamStore::apply_portal_edits).
//!
//! [`NullPortal`] is for builds without a portal.

use log::{debug, info, warn};

use crate::app::ports::{FieldEdit, ParamPortal};
use crate::params::schema::FieldSpec;

/// Rejections for a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalError {
    /// No registered field has this id.
    UnknownField,
    /// The value exceeds the field's `maxlength`.
    TooLong,
}

impl core::fmt::Display for PortalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownField => write!(f, "unknown field"),
            Self::TooLong => write!(f, "value too long"),
        }
    }
}

/// One input element of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub index: usize,
    pub spec: FieldSpec,
    /// Value held by the store.
    pub value: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct FormPortal {
    fields: Vec<FormField>,
    pending: Vec<FieldEdit>,
    saved: bool,
}

impl FormPortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Stored value shown for field `id`.
    pub fn value(&self, id: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|f| f.spec.id == id)
            .map(|f| f.value.as_slice())
    }

    /// Unsaved input for field `id`, if the user typed any.
    pub fn staged(&self, id: &str) -> Option<&[u8]> {
        let field = self.fields.iter().find(|f| f.spec.id == id)?;
        self.pending
            .iter()
            .find(|e| e.index == field.index)
            .map(|e| e.value.as_slice())
    }

    /// User typed `value` into field `id`. Nothing changes until
    /// [`save`](Self::save).
    pub fn submit(&mut self, id: &str, value: &[u8]) -> Result<(), PortalError> {
        let field = self
            .fields
            .iter()
            .find(|f| f.spec.id == id)
            .ok_or(PortalError::UnknownField)?;
        if value.len() > field.spec.capacity() {
            return Err(PortalError::TooLong);
        }

        let edit = FieldEdit::new(field.index, value);
        match self.pending.iter_mut().find(|e| e.index == edit.index) {
            Some(existing) => *existing = edit,
            None => self.pending.push(edit),
        }
        debug!("FormPortal: staged '{}'", id);
        Ok(())
    }

    /// User pressed "Save".
    pub fn save(&mut self) {
        self.saved = true;
    }

    /// Drop staged edits without saving.
    pub fn discard(&mut self) {
        self.pending.clear();
        self.saved = false;
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl ParamPortal for FormPortal {
    fn add_field(&mut self, index: usize, spec: &FieldSpec, value: &[u8]) {
        let field = FormField {
            index,
            spec: *spec,
            value: value.to_vec(),
        };

        match self.fields.iter_mut().find(|f| f.index == index) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    fn update_field(&mut self, index: usize, value: &[u8]) {
        match self.fields.iter_mut().find(|f| f.index == index) {
            Some(field) => {
                field.value.clear();
                field.value.extend_from_slice(value);
            }
            None => warn!("FormPortal: update for unregistered field {}", index),
        }
    }

    fn take_saved(&mut self) -> Option<Vec<FieldEdit>> {
        if !self.saved {
            return None;
        }
        self.saved = false;

        let edits = core::mem::take(&mut self.pending);
        info!("FormPortal: saving {} edited field(s)", edits.len());
        Some(edits)
    }
}

/// Portal that shows nothing and never saves.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPortal;

impl ParamPortal for NullPortal {
    fn add_field(&mut self, _index: usize, _spec: &FieldSpec, _value: &[u8]) {}

    fn update_field(&mut self, _index: usize, _value: &[u8]) {}

    fn take_saved(&mut self) -> Option<Vec<FieldEdit>> {
        None
    }
}
