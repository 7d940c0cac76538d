//! Versioned parameter storage.
//!
//! | Module   | Contents                                           |
//! |----------|----------------------------------------------------|
//! | `schema` | `FieldSpec`, record `Layout`, header constants      |
//! | `field`  | `FieldValue` capacity-bounded byte value           |
//! | `store`  | `ParamStore` load / get / set / persist            |

pub mod field;
pub mod schema;
pub mod store;

pub use field::FieldValue;
pub use schema::{FieldSpec, HEADER_LEN, Layout};
pub use store::{Field, ParamStore};

