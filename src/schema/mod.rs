//! Schema system - field descriptors, loading and per-field validation

pub mod diagnostics;
pub mod field;
pub mod form;
pub mod loader;
pub mod validator;

pub use diagnostics::{DocumentFormat, DocumentSyntaxError};
pub use field::{FieldDescriptor, FieldKind, FieldOption, OptionValue};
pub use form::{DuplicateKeyError, FormSchema, DEFAULT_SUBMIT_TEXT};
pub use loader::{SchemaError, SchemaLoader};
pub use validator::{compile_pattern, validate_field, FieldError, FieldValidator, Violation};
