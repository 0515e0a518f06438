//! Form domain layer
//!
//! The field registry, value store, and error store live behind
//! `FormManager`; everything above this module goes through its
//! operations and read-only views.

mod field;
mod manager;

pub use field::{validate, FieldDescriptor, FieldDraft, FieldKind, ValidationError};
pub use manager::{FormError, FormManager, FormPhase, Submission};
