//! Per-field validation rules
//!
//! Rules run in a fixed order and the first failing rule wins, so a field
//! carries at most one message at a time:
//!
//! 1. required
//! 2. email shape
//! 3. string length bounds, then `pattern`
//! 4. numeric bounds
//!
//! An empty value stops after rule 1, so an untouched optional field never
//! fails. Patterns use the JavaScript-style dialect of `fancy-regex`, which
//! accepts lookaround and backreferences.

use fancy_regex::Regex as Pattern;
use miette::Diagnostic;
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;
use thiserror::Error;

use crate::core::value;
use crate::schema::field::{FieldDescriptor, FieldKind};

/// Basic `local@domain.tld` shape
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email shape is a valid regex"));

/// The rule a value broke
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("This field is required")]
    Required,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Minimum {0} characters")]
    TooShort(usize),

    #[error("Maximum {0} characters")]
    TooLong(usize),

    #[error("Invalid format")]
    PatternMismatch,

    #[error("Minimum {0}")]
    BelowMin(Number),

    #[error("Maximum {0}")]
    AboveMax(Number),
}

/// A field validation failure, attached to the field's key
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{key}: {violation}")]
#[diagnostic(code(dynform::field::invalid))]
pub struct FieldError {
    key: String,
    violation: Violation,
}

impl FieldError {
    pub fn new(key: impl Into<String>, violation: Violation) -> Self {
        Self {
            key: key.into(),
            violation,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn violation(&self) -> &Violation {
        &self.violation
    }

    /// The human-readable message shown next to the field
    pub fn message(&self) -> String {
        self.violation.to_string()
    }
}

/// Compile a field pattern, or explain why it cannot be used
pub fn compile_pattern(pattern: &str) -> Result<Pattern, fancy_regex::Error> {
    Pattern::new(pattern)
}

/// Validation rules for one field with its pattern compiled up front
///
/// A pattern that does not compile is dropped here with a warning, so it
/// never blocks a value later.
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
    pattern: Option<Pattern>,
}

impl FieldValidator {
    pub fn compile(field: &FieldDescriptor) -> Self {
        let pattern = field
            .pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .and_then(|p| match compile_pattern(p) {
                Ok(re) => Some(re),
                Err(err) => {
                    tracing::warn!(
                        key = %field.key,
                        pattern = p,
                        error = %err,
                        "ignoring malformed pattern"
                    );
                    None
                }
            });
        Self { pattern }
    }

    /// Whether a usable pattern rule is in effect
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    /// Check `value` against the field's rules
    pub fn validate(&self, field: &FieldDescriptor, value: &Value) -> Option<FieldError> {
        self.violation(field, value)
            .map(|violation| FieldError::new(&field.key, violation))
    }

    fn violation(&self, field: &FieldDescriptor, value: &Value) -> Option<Violation> {
        if field.required {
            let empty = value::is_blank(value)
                || (field.kind == FieldKind::Checkbox && !value::is_truthy(value));
            if empty {
                return Some(Violation::Required);
            }
        }
        if value::is_blank(value) {
            return None;
        }

        if field.kind == FieldKind::Email
            && value::is_truthy(value)
            && !EMAIL_SHAPE.is_match(&value::display(value))
        {
            return Some(Violation::InvalidEmail);
        }

        if let Value::String(s) = value {
            let len = s.chars().count();
            // A bound of zero means "no bound"
            if let Some(min) = field.min_length.filter(|n| *n > 0) {
                if len < min {
                    return Some(Violation::TooShort(min));
                }
            }
            if let Some(max) = field.max_length.filter(|n| *n > 0) {
                if len > max {
                    return Some(Violation::TooLong(max));
                }
            }
            if let Some(re) = &self.pattern {
                match re.is_match(s) {
                    Ok(true) => {}
                    Ok(false) => return Some(Violation::PatternMismatch),
                    Err(err) => {
                        // Backtrack limit hit; the value is let through
                        tracing::warn!(key = %field.key, error = %err, "pattern could not be evaluated");
                    }
                }
            }
        }

        if let Some(x) = value.as_f64().filter(|x| !x.is_nan()) {
            if let Some(min) = &field.min {
                if min.as_f64().is_some_and(|m| x < m) {
                    return Some(Violation::BelowMin(min.clone()));
                }
            }
            if let Some(max) = &field.max {
                if max.as_f64().is_some_and(|m| x > m) {
                    return Some(Violation::AboveMax(max.clone()));
                }
            }
        }

        None
    }
}

/// Validate a single value against a field descriptor
///
/// Compiles the field's pattern on every call; hold a [`FieldValidator`]
/// when validating the same field repeatedly.
pub fn validate_field(field: &FieldDescriptor, value: &Value) -> Option<FieldError> {
    FieldValidator::compile(field).validate(field, value)
}
