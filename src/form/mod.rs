//! Form state

pub mod engine;
pub mod values;

pub use engine::{FormEngine, FormError, SubmitError, SubmitHandler};
pub use values::FormValues;
