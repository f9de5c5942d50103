pub mod commands;
pub mod form;

pub use form::{FieldKind, FormDraft, FormField, FormState, FormTarget};
