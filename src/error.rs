//! Unified error types for the plug firmware core.
//!
//! A single `Error` enum that every subsystem converts into, so the host
//! loop handles failures uniformly. All variants are `Copy` so they can be
//! passed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The non-volatile medium could not be opened, read, written or committed.
    Medium(MediumError),
    /// A parameter schema violated its size contract.
    Schema(SchemaError),
    /// Device configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Medium(e) => write!(f, "medium: {e}"),
            Self::Schema(e) => write!(f, "schema: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Medium errors
// ---------------------------------------------------------------------------

/// Faults reported by a [`NvMemoryPort`](crate::app::ports::NvMemoryPort).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediumError {
    /// An access was attempted without a prior `open`.
    NotOpen,
    /// `open` was called while a session was already active.
    AlreadyOpen,
    /// The requested range lies outside the opened window or the device.
    OutOfBounds,
    /// The backing store could not be opened (driver return code).
    Unavailable(i32),
    /// The buffered window could not be written back (driver return code).
    CommitFailed(i32),
}

impl fmt::Display for MediumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOpen => write!(f, "medium not open"),
            Self::AlreadyOpen => write!(f, "medium already open"),
            Self::OutOfBounds => write!(f, "access out of bounds"),
            Self::Unavailable(rc) => write!(f, "medium unavailable (rc={rc})"),
            Self::CommitFailed(rc) => write!(f, "commit failed (rc={rc})"),
        }
    }
}

impl core::error::Error for MediumError {}

impl From<MediumError> for Error {
    fn from(e: MediumError) -> Self {
        Self::Medium(e)
    }
}

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaError {
    /// A field declares a capacity of zero.
    ZeroCapacity(&'static str),
    /// The record extent does not fit the 16-bit header length.
    TooLarge,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity(id) => write!(f, "field '{id}' has zero capacity"),
            Self::TooLarge => write!(f, "record exceeds 16-bit extent"),
        }
    }
}

impl core::error::Error for SchemaError {}

impl From<SchemaError> for Error {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors surfaced by [`ParamStore`](crate::params::ParamStore).
///
/// Format mismatches and out-of-range indices are not errors; they are
/// handled locally as "no prior data" and "absent" respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    Schema(SchemaError),
    Medium(MediumError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "invalid schema: {e}"),
            Self::Medium(e) => write!(f, "{e}"),
        }
    }
}

impl core::error::Error for StoreError {}

impl From<SchemaError> for StoreError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl From<MediumError> for StoreError {
    fn from(e: MediumError) -> Self {
        Self::Medium(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Schema(e) => Self::Schema(e),
            StoreError::Medium(e) => Self::Medium(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
