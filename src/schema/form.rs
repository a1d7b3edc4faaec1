//! Form schema - the declarative description of a whole form

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::schema::field::FieldDescriptor;

/// Text of the submit control when the schema does not set one
pub const DEFAULT_SUBMIT_TEXT: &str = "Submit";

/// A form: display strings plus an ordered list of fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_text: Option<String>,

    pub fields: Vec<FieldDescriptor>,
}

/// Two fields in one schema share a key
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("Duplicate field key '{key}' (fields #{first} and #{second})")]
#[diagnostic(
    code(dynform::schema::duplicate_key),
    help("Each field needs its own key; rename one of the fields")
)]
pub struct DuplicateKeyError {
    pub key: String,
    /// 1-based position of the first field using the key
    pub first: usize,
    /// 1-based position of the offending field
    pub second: usize,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_submit_text(mut self, text: impl Into<String>) -> Self {
        self.submit_text = Some(text.into());
        self
    }

    /// Text for the submit control
    pub fn submit_text(&self) -> &str {
        self.submit_text.as_deref().unwrap_or(DEFAULT_SUBMIT_TEXT)
    }

    /// Look up a field by key
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Field keys in schema order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    /// Reject schemas where two fields share a key
    pub fn check_keys(&self) -> Result<(), DuplicateKeyError> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (idx, field) in self.fields.iter().enumerate() {
            if let Some(first) = seen.insert(field.key.as_str(), idx) {
                return Err(DuplicateKeyError {
                    key: field.key.clone(),
                    first: first + 1,
                    second: idx + 1,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submit_text_default() {
        let schema = FormSchema::new(vec![]);
        assert_eq!(schema.submit_text(), "Submit");
        assert_eq!(schema.with_submit_text("Create account").submit_text(), "Create account");
    }

    #[test]
    fn test_field_lookup() {
        let schema = FormSchema::new(vec![
            FieldDescriptor::new("name", "text"),
            FieldDescriptor::new("age", "number"),
        ]);
        assert_eq!(schema.field("age").map(|f| f.key.as_str()), Some("age"));
        assert!(schema.field("missing").is_none());
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["name", "age"]);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let schema = FormSchema::new(vec![
            FieldDescriptor::new("name", "text"),
            FieldDescriptor::new("email", "email"),
            FieldDescriptor::new("name", "textarea"),
        ]);
        let err = schema.check_keys().unwrap_err();
        assert_eq!(err.key, "name");
        assert_eq!(err.first, 1);
        assert_eq!(err.second, 3);
    }

    #[test]
    fn test_deserialize_schema() {
        let schema: FormSchema = serde_json::from_value(json!({
            "title": "Signup",
            "submitText": "Go",
            "fields": [
                {"key": "name", "type": "text", "required": true}
            ]
        }))
        .unwrap();
        assert_eq!(schema.title.as_deref(), Some("Signup"));
        assert_eq!(schema.submit_text(), "Go");
        assert!(schema.fields[0].required);
        assert!(schema.check_keys().is_ok());
    }
}
