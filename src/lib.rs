//! dynform: schema-driven forms in the terminal
//!
//! A form is described by a JSON or YAML schema listing its fields. The
//! engine keeps one value and at most one error per field, validates fields
//! as they change and as a whole on submit, and renders each field with a
//! renderer chosen by its kind.

pub mod cli;
pub mod core;
pub mod form;
pub mod render;
pub mod schema;

pub use form::{FormEngine, FormValues};
pub use render::{FieldRenderer, RendererRegistry};
pub use schema::{FieldDescriptor, FieldKind, FormSchema};
