//! Form state: values, live validation, submit and reset
//!
//! The engine owns the schema, one value per field and at most one error per
//! field. All mutation goes through [`FormEngine::set_field_value`],
//! [`FormEngine::submit`], [`FormEngine::reset`] and
//! [`FormEngine::load_schema`].

use miette::Diagnostic;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::form::values::FormValues;
use crate::schema::form::{DuplicateKeyError, FormSchema};
use crate::schema::validator::{FieldError, FieldValidator};

static NULL: Value = Value::Null;

/// Callback invoked with the values of a successful submit
pub type SubmitHandler = Box<dyn FnMut(&FormValues)>;

/// Errors from operations on a loaded form
#[derive(Debug, Error, Diagnostic)]
pub enum FormError {
    #[error("Unknown field: {key}")]
    #[diagnostic(
        code(dynform::form::unknown_field),
        help("Field keys must match a field in the loaded schema")
    )]
    UnknownField { key: String },
}

/// A submit blocked by failing fields
#[derive(Debug, Error, Diagnostic)]
#[error("Form has {summary}")]
#[diagnostic(
    code(dynform::form::invalid),
    help("Fix the listed fields and submit again")
)]
pub struct SubmitError {
    summary: String,

    #[related]
    errors: Vec<FieldError>,
}

impl SubmitError {
    fn new(errors: Vec<FieldError>) -> Self {
        let summary = if errors.len() == 1 {
            "1 invalid field".to_string()
        } else {
            format!("{} invalid fields", errors.len())
        };
        Self { summary, errors }
    }

    /// Every failing field, in schema order
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, key: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.key() == key)
    }
}

/// Holds the state of one form
pub struct FormEngine {
    schema: FormSchema,
    /// Compiled rules, parallel to `schema.fields`
    validators: Vec<FieldValidator>,
    initial: HashMap<String, Value>,
    values: HashMap<String, Value>,
    errors: HashMap<String, FieldError>,
    on_submit: Option<SubmitHandler>,
}

impl FormEngine {
    /// Create an engine for a schema, rejecting duplicate field keys
    pub fn new(schema: FormSchema) -> Result<Self, DuplicateKeyError> {
        schema.check_keys()?;

        let mut engine = Self {
            schema: FormSchema::default(),
            validators: Vec::new(),
            initial: HashMap::new(),
            values: HashMap::new(),
            errors: HashMap::new(),
            on_submit: None,
        };
        engine.install(schema);
        Ok(engine)
    }

    /// Set the callback invoked on a successful submit
    pub fn with_submit_handler(mut self, handler: impl FnMut(&FormValues) + 'static) -> Self {
        self.on_submit = Some(Box::new(handler));
        self
    }

    /// Swap in a new schema
    ///
    /// Values re-initialize to the new schema's defaults and all errors are
    /// dropped. On a duplicate key the current state is left untouched.
    pub fn load_schema(&mut self, schema: FormSchema) -> Result<(), DuplicateKeyError> {
        schema.check_keys()?;
        self.install(schema);
        Ok(())
    }

    fn install(&mut self, schema: FormSchema) {
        self.validators = schema.fields.iter().map(FieldValidator::compile).collect();
        self.initial = schema
            .fields
            .iter()
            .map(|f| (f.key.clone(), f.initial_value()))
            .collect();
        self.values = self.initial.clone();
        self.errors.clear();
        self.schema = schema;

        tracing::debug!(fields = self.schema.fields.len(), "form state initialized");
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Current value of a field
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Current error of a field, if it has one
    pub fn error(&self, key: &str) -> Option<&FieldError> {
        self.errors.get(key)
    }

    /// Current errors in schema order
    pub fn errors(&self) -> Vec<&FieldError> {
        self.schema
            .keys()
            .filter_map(|key| self.errors.get(key))
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Snapshot of the current values
    pub fn values(&self) -> FormValues {
        self.snapshot(&self.values)
    }

    /// Snapshot of the values computed when the schema was loaded
    pub fn initial_values(&self) -> FormValues {
        self.snapshot(&self.initial)
    }

    fn snapshot(&self, source: &HashMap<String, Value>) -> FormValues {
        self.schema
            .keys()
            .map(|key| {
                let value = source.get(key).cloned().unwrap_or(Value::Null);
                (key.to_string(), value)
            })
            .collect()
    }

    /// Update one field and re-validate just that field
    pub fn set_field_value(&mut self, key: &str, value: Value) -> Result<(), FormError> {
        let idx = self
            .schema
            .fields
            .iter()
            .position(|f| f.key == key)
            .ok_or_else(|| FormError::UnknownField {
                key: key.to_string(),
            })?;

        let field = &self.schema.fields[idx];
        let value = field.normalize(value);

        match self.validators[idx].validate(field, &value) {
            Some(err) => {
                self.errors.insert(key.to_string(), err);
            }
            None => {
                self.errors.remove(key);
            }
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Validate every field and hand the values to the submit handler
    ///
    /// The full pass replaces all errors, so every failing field is reported
    /// at once. The handler only runs when nothing fails.
    pub fn submit(&mut self) -> Result<FormValues, SubmitError> {
        let mut errors = HashMap::new();
        let mut failed = Vec::new();

        for (field, validator) in self.schema.fields.iter().zip(&self.validators) {
            let value = self.values.get(&field.key).unwrap_or(&NULL);
            if let Some(err) = validator.validate(field, value) {
                failed.push(err.clone());
                errors.insert(field.key.clone(), err);
            }
        }
        self.errors = errors;

        if !failed.is_empty() {
            tracing::debug!(invalid = failed.len(), "submit blocked");
            return Err(SubmitError::new(failed));
        }

        let values = self.values();
        if let Some(handler) = self.on_submit.as_mut() {
            handler(&values);
        }
        tracing::debug!(fields = values.len(), "form submitted");
        Ok(values)
    }

    /// Restore the initial values and clear every error
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        tracing::debug!("form reset");
    }
}

impl fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormEngine")
            .field("schema", &self.schema)
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("has_submit_handler", &self.on_submit.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field::FieldDescriptor;
    use crate::schema::validator::Violation;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn signup_schema() -> FormSchema {
        FormSchema::new(vec![
            FieldDescriptor::new("name", "text").required().min_length(2),
            FieldDescriptor::new("email", "email").required(),
            FieldDescriptor::new("age", "number").min(1).max(120),
            FieldDescriptor::new("newsletter", "checkbox").default_value(true),
            FieldDescriptor::new("role", "select")
                .option("Frontend", "fe")
                .option("Backend", "be"),
        ])
    }

    /// Engine whose submit handler records every call
    fn recording_engine(schema: FormSchema) -> (FormEngine, Rc<RefCell<Vec<FormValues>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let engine = FormEngine::new(schema)
            .unwrap()
            .with_submit_handler(move |values| sink.borrow_mut().push(values.clone()));
        (engine, calls)
    }

    #[test]
    fn test_initial_state() {
        let engine = FormEngine::new(signup_schema()).unwrap();
        let values = engine.values();
        assert_eq!(values.get("name"), Some(&json!("")));
        assert_eq!(values.get("age"), Some(&json!("")));
        assert_eq!(values.get("newsletter"), Some(&json!(true)));
        assert!(!engine.has_errors());
        assert_eq!(engine.values(), engine.initial_values());
    }

    #[test]
    fn test_every_key_has_one_value() {
        let engine = FormEngine::new(signup_schema()).unwrap();
        let values = engine.values();
        let keys: Vec<&str> = values.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "email", "age", "newsletter", "role"]);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let schema = FormSchema::new(vec![
            FieldDescriptor::new("a", "text"),
            FieldDescriptor::new("a", "number"),
        ]);
        assert!(FormEngine::new(schema).is_err());
    }

    #[test]
    fn test_live_validation_touches_one_field() {
        let mut engine = FormEngine::new(signup_schema()).unwrap();
        engine.set_field_value("name", json!("A")).unwrap();

        assert_eq!(
            engine.error("name").map(|e| e.violation()),
            Some(&Violation::TooShort(2))
        );
        // Untouched required field stays clean until submit
        assert!(engine.error("email").is_none());

        engine.set_field_value("name", json!("Al")).unwrap();
        assert!(engine.error("name").is_none());
        assert!(!engine.has_errors());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut engine = FormEngine::new(signup_schema()).unwrap();
        let before = engine.values();
        let err = engine.set_field_value("nope", json!("x")).unwrap_err();
        assert!(matches!(err, FormError::UnknownField { ref key } if key == "nope"));
        assert_eq!(engine.values(), before);
    }

    #[test]
    fn test_set_value_is_idempotent() {
        let mut once = FormEngine::new(signup_schema()).unwrap();
        once.set_field_value("email", json!("bad")).unwrap();

        let mut twice = FormEngine::new(signup_schema()).unwrap();
        twice.set_field_value("email", json!("bad")).unwrap();
        twice.set_field_value("email", json!("bad")).unwrap();

        assert_eq!(once.values(), twice.values());
        assert_eq!(once.errors(), twice.errors());
    }

    #[test]
    fn test_select_stores_canonical_string() {
        let schema = FormSchema::new(vec![FieldDescriptor::new("level", "radio")]);
        let mut engine = FormEngine::new(schema).unwrap();
        engine.set_field_value("level", json!(3)).unwrap();
        assert_eq!(engine.value("level"), Some(&json!("3")));
    }

    #[test]
    fn test_submit_reports_every_failing_field() {
        let (mut engine, calls) = recording_engine(signup_schema());
        engine.set_field_value("age", json!(121)).unwrap();

        let err = engine.submit().unwrap_err();
        let keys: Vec<&str> = err.errors().iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["name", "email", "age"]);
        assert_eq!(engine.errors().len(), 3);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_submit_success_calls_handler() {
        let (mut engine, calls) = recording_engine(signup_schema());
        engine.set_field_value("name", json!("Al")).unwrap();
        engine.set_field_value("email", json!("a@b.co")).unwrap();
        engine.set_field_value("age", json!(30)).unwrap();

        let values = engine.submit().unwrap();
        assert_eq!(values.get_string("name"), Some("Al"));
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0], values);
    }

    #[test]
    fn test_submit_clears_stale_errors() {
        let mut engine = FormEngine::new(signup_schema()).unwrap();
        assert!(engine.submit().is_err());
        engine.set_field_value("name", json!("Al")).unwrap();
        engine.set_field_value("email", json!("a@b.co")).unwrap();
        assert!(engine.submit().is_ok());
        assert!(!engine.has_errors());
    }

    #[test]
    fn test_scenario_required_name() {
        let schema = FormSchema::new(vec![FieldDescriptor::new("name", "text")
            .required()
            .min_length(2)]);
        let (mut engine, calls) = recording_engine(schema);

        let err = engine.submit().unwrap_err();
        assert_eq!(err.error_for("name").map(|e| e.message()).as_deref(), Some("This field is required"));
        assert!(calls.borrow().is_empty());

        engine.set_field_value("name", json!("A")).unwrap();
        let err = engine.submit().unwrap_err();
        assert_eq!(err.error_for("name").map(|e| e.violation()), Some(&Violation::TooShort(2)));
        assert!(calls.borrow().is_empty());

        engine.set_field_value("name", json!("Al")).unwrap();
        let values = engine.submit().unwrap();
        assert_eq!(values.to_json(), json!({"name": "Al"}));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_numeric_boundaries() {
        let schema = FormSchema::new(vec![FieldDescriptor::new("age", "number").min(1).max(120)]);
        let mut engine = FormEngine::new(schema).unwrap();
        for (value, ok) in [(0, false), (1, true), (120, true), (121, false)] {
            engine.set_field_value("age", json!(value)).unwrap();
            assert_eq!(engine.error("age").is_none(), ok, "age = {}", value);
        }
    }

    #[test]
    fn test_reset_restores_initial_snapshot() {
        let mut engine = FormEngine::new(signup_schema()).unwrap();
        let initial = engine.initial_values();

        engine.set_field_value("name", json!("A")).unwrap();
        engine.set_field_value("newsletter", json!(false)).unwrap();
        engine.set_field_value("age", json!(0)).unwrap();
        assert!(engine.has_errors());

        engine.reset();
        assert_eq!(engine.values(), initial);
        assert_eq!(engine.value("newsletter"), Some(&json!(true)));
        assert!(!engine.has_errors());
    }

    #[test]
    fn test_schema_swap_drops_old_keys() {
        let mut engine = FormEngine::new(signup_schema()).unwrap();
        engine.set_field_value("name", json!("A")).unwrap();

        let next = FormSchema::new(vec![FieldDescriptor::new("city", "text").default_value("Oslo")]);
        engine.load_schema(next).unwrap();

        assert_eq!(engine.values().to_json(), json!({"city": "Oslo"}));
        assert!(engine.value("name").is_none());
        assert!(engine.error("name").is_none());
        assert!(engine.set_field_value("name", json!("x")).is_err());
    }

    #[test]
    fn test_failed_schema_swap_keeps_state() {
        let mut engine = FormEngine::new(signup_schema()).unwrap();
        engine.set_field_value("name", json!("Al")).unwrap();

        let bad = FormSchema::new(vec![
            FieldDescriptor::new("x", "text"),
            FieldDescriptor::new("x", "text"),
        ]);
        assert!(engine.load_schema(bad).is_err());
        assert_eq!(engine.value("name"), Some(&json!("Al")));
    }

    #[test]
    fn test_malformed_pattern_never_blocks_submit() {
        let schema = FormSchema::new(vec![FieldDescriptor::new("code", "text")
            .required()
            .pattern("(unclosed")]);
        let mut engine = FormEngine::new(schema).unwrap();
        engine.set_field_value("code", json!("anything")).unwrap();
        assert!(engine.submit().is_ok());
    }

    #[test]
    fn test_untouched_optional_fields_never_block_submit() {
        let schema = FormSchema::new(vec![
            FieldDescriptor::new("nick", "text").min_length(3),
            FieldDescriptor::new("zip", "text").pattern(r"^\d{5}$"),
            FieldDescriptor::new("age", "number").min(18),
        ]);
        let (mut engine, calls) = recording_engine(schema);

        let values = engine.submit().unwrap();
        assert_eq!(values.get("nick"), Some(&json!("")));
        assert_eq!(calls.borrow().len(), 1);

        engine.set_field_value("zip", json!("123")).unwrap();
        let err = engine.submit().unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].violation(), &Violation::PatternMismatch);

        // Clearing the value makes the field optional-and-empty again
        engine.set_field_value("zip", json!("")).unwrap();
        assert!(engine.submit().is_ok());
    }
}
