//! Schema documents - parsing and structure checks with detailed error reporting
//!
//! Loading a form schema is the host's job: the engine only ever sees a
//! well-formed [`FormSchema`]. The loader turns JSON or YAML text into one,
//! reporting syntax errors, meta-schema violations and duplicate keys as
//! source-annotated diagnostics.

use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use regex::Regex;
use rust_embed::Embed;
use serde_json::Value as JsonValue;
use std::path::Path;
use thiserror::Error;

use crate::schema::diagnostics::{DocumentFormat, DocumentSyntaxError};
use crate::schema::form::FormSchema;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// Meta-schema every form schema document is checked against
const META_SCHEMA_FILE: &str = "form.schema.json";

/// The "Dynamic JSON-driven Form" sample schema
const DEMO_SCHEMA_FILE: &str = "demo.json";

/// Errors raised while loading a schema document
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    #[error("Failed to read {path}")]
    #[diagnostic(code(dynform::schema::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] DocumentSyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Structure(#[from] SchemaStructureError),

    #[error("Duplicate field key '{key}'")]
    #[diagnostic(
        code(dynform::schema::duplicate_key),
        help("Each field needs its own key; rename one of the fields")
    )]
    DuplicateKey {
        key: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("second field with this key")]
        span: SourceSpan,
    },

    #[error("Embedded schema '{0}' is missing")]
    #[diagnostic(code(dynform::schema::embedded))]
    MissingEmbedded(&'static str),
}

/// A document that parsed but does not describe a form
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid form schema: {} problem(s) found", .violations.len())]
#[diagnostic(code(dynform::schema::structure))]
pub struct SchemaStructureError {
    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<SchemaViolation>,
}

impl SchemaStructureError {
    pub fn new(filename: &str, source: &str, violations: Vec<SchemaViolation>) -> Self {
        Self {
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }
}

/// One problem with the shape of a schema document
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaViolation {
    message: String,

    #[label("{}", self.label)]
    span: SourceSpan,
    label: &'static str,

    #[help]
    help: Option<String>,
}

impl SchemaViolation {
    pub fn new(message: impl Into<String>, label: &'static str, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            message: message.into(),
            span,
            label,
            help,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// Loads form schemas from JSON or YAML text
pub struct SchemaLoader {
    /// Compiled meta-schema; structure checks are skipped without it
    meta: Option<JsonValidator>,
}

impl SchemaLoader {
    pub fn new() -> Self {
        let meta = embedded_source(META_SCHEMA_FILE)
            .and_then(|src| serde_json::from_str::<JsonValue>(&src).ok())
            .and_then(|schema| match validator_for(&schema) {
                Ok(validator) => Some(validator),
                Err(err) => {
                    tracing::error!(error = %err, "form meta-schema failed to compile");
                    None
                }
            });

        Self { meta }
    }

    /// Load a schema from a file; the extension picks JSON or YAML
    pub fn load_file(&self, path: &Path) -> Result<FormSchema, SchemaError> {
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let filename = path.to_string_lossy();
        self.load_str(&content, &filename)
    }

    /// Load a schema from document text
    pub fn load_str(&self, content: &str, filename: &str) -> Result<FormSchema, SchemaError> {
        let document = parse_document(content, filename)?;

        if let Some(meta) = &self.meta {
            let violations: Vec<SchemaViolation> = meta
                .iter_errors(&document)
                .map(|e| violation_for(content, &e))
                .collect();
            if !violations.is_empty() {
                return Err(SchemaStructureError::new(filename, content, violations).into());
            }
        }

        let schema: FormSchema = serde_json::from_value(document).map_err(|e| {
            let violation = SchemaViolation::new(
                format!("Document does not describe a form: {}", e),
                "not a form schema",
                first_line_span(content),
                None,
            );
            SchemaStructureError::new(filename, content, vec![violation])
        })?;

        if let Err(dup) = schema.check_keys() {
            return Err(SchemaError::DuplicateKey {
                span: find_field_key_span(content, &dup.key, 1),
                key: dup.key,
                src: NamedSource::new(filename, content.to_string()),
            });
        }

        for field in schema.fields.iter().filter(|f| f.kind.has_options() && f.options.is_empty()) {
            tracing::warn!(key = %field.key, kind = %field.kind, "field has no options to choose from");
        }

        tracing::debug!(
            file = filename,
            title = schema.title.as_deref().unwrap_or(""),
            fields = schema.fields.len(),
            "loaded form schema"
        );

        Ok(schema)
    }

    /// Source text of the demo schema
    pub fn demo_source() -> Result<String, SchemaError> {
        embedded_source(DEMO_SCHEMA_FILE).ok_or(SchemaError::MissingEmbedded(DEMO_SCHEMA_FILE))
    }

    /// The demo schema, parsed
    pub fn demo_schema(&self) -> Result<FormSchema, SchemaError> {
        self.load_str(&Self::demo_source()?, DEMO_SCHEMA_FILE)
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse JSON or YAML text (chosen by file name) into a JSON value
pub fn parse_document(content: &str, filename: &str) -> Result<JsonValue, DocumentSyntaxError> {
    match DocumentFormat::from_filename(filename) {
        DocumentFormat::Json => serde_json::from_str(content)
            .map_err(|e| DocumentSyntaxError::from_json_error(&e, content, filename)),
        DocumentFormat::Yaml => serde_yml::from_str(content)
            .map_err(|e| DocumentSyntaxError::from_yaml_error(&e, content, filename)),
    }
}

fn embedded_source(name: &str) -> Option<String> {
    let file = EmbeddedSchemas::get(name)?;
    String::from_utf8(file.data.into_owned()).ok()
}

/// Turn one meta-schema violation into a spanned diagnostic
fn violation_for(content: &str, error: &JsonSchemaError) -> SchemaViolation {
    use jsonschema::error::ValidationErrorKind as Kind;

    let path = error.instance_path.as_str();
    let place = describe_path(path);

    let (message, label, help) = match &error.kind {
        Kind::Required { property } => {
            let name = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            let help = match name.as_str() {
                "fields" => "Schema must contain a 'fields' array".to_string(),
                "key" => "Every field needs a unique, non-empty 'key'".to_string(),
                "type" => "Every field needs a 'type': text, email, password, number, textarea, select, checkbox, date or radio".to_string(),
                other => format!("Add the '{}' property", other),
            };
            (format!("{} is missing '{}'", place, name), "missing property", Some(help))
        }
        Kind::Type { kind } => (
            format!("{} has the wrong type, expected {:?}", place, kind),
            "wrong type",
            None,
        ),
        Kind::MinLength { .. } => (
            format!("{} must not be empty", place),
            "empty",
            Some("Keys and types cannot be empty strings".to_string()),
        ),
        Kind::Minimum { limit } => (
            format!("{} must be at least {}", place, limit),
            "too small",
            Some("Length bounds are character counts and cannot be negative".to_string()),
        ),
        _ => (format!("{}: {}", place, error), "invalid", None),
    };

    SchemaViolation::new(message, label, find_path_span(content, path), help)
}

/// Wording for an instance path such as `/fields/2/minLength`
fn describe_path(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match parts.as_slice() {
        [] => "The document".to_string(),
        ["fields", idx, rest @ ..] => match idx.parse::<usize>() {
            Ok(i) if rest.is_empty() => format!("Field #{}", i + 1),
            Ok(i) => format!("'{}' of field #{}", rest.join("/"), i + 1),
            Err(_) => format!("'{}'", path),
        },
        _ => format!("'{}'", path),
    }
}

fn first_line_span(content: &str) -> SourceSpan {
    let len = content.find('\n').unwrap_or(content.len()).max(1);
    (0, len).into()
}

/// Find the span for a JSON path in the document
fn find_path_span(content: &str, json_path: &str) -> SourceSpan {
    // Parse the path (e.g., "/fields" or "/fields/2/options/0")
    let parts: Vec<&str> = json_path.split('/').filter(|s| !s.is_empty()).collect();

    let Some(search_key) = parts.last() else {
        return first_line_span(content);
    };

    // Handle array indices
    if search_key.parse::<usize>().is_ok() {
        // It's an array index - search for parent key
        if parts.len() >= 2 {
            let parent_key = parts[parts.len() - 2];
            if let Some(span) = find_key_span(content, parent_key) {
                return span;
            }
        }
    }

    if let Some(span) = find_key_span(content, search_key) {
        return span;
    }

    first_line_span(content)
}

/// Find the span of a mapping key, quoted (JSON) or bare (YAML)
fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let pattern = format!(r#"["']?\b{}\b["']?\s*:"#, regex::escape(key));
    let re = Regex::new(&pattern).ok()?;
    re.find(content).map(|m| (m.start(), m.len()).into())
}

/// Find the `nth` (0-based) field whose `key` is `value`
fn find_field_key_span(content: &str, value: &str, nth: usize) -> SourceSpan {
    let pattern = format!(
        r#"(?m)["']?\bkey["']?\s*:\s*["']?{}(?:["']|\s*[,}}]|\s*$)"#,
        regex::escape(value)
    );
    Regex::new(&pattern)
        .ok()
        .and_then(|re| re.find_iter(content).nth(nth))
        .map(|m| (m.start(), m.len()).into())
        .unwrap_or_else(|| first_line_span(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field::FieldKind;

    #[test]
    fn test_loader_has_meta_schema() {
        let loader = SchemaLoader::new();
        assert!(loader.meta.is_some());
    }

    #[test]
    fn test_load_demo_schema() {
        let loader = SchemaLoader::new();
        let schema = loader.demo_schema().unwrap();
        assert_eq!(schema.title.as_deref(), Some("Dynamic JSON-driven Form"));
        assert_eq!(schema.submit_text(), "Create account");
        assert_eq!(schema.fields.len(), 9);
        assert_eq!(schema.fields[3].kind, FieldKind::Number);
    }

    #[test]
    fn test_load_yaml() {
        let yaml = r#"
title: Contact
fields:
  - key: email
    type: email
    required: true
  - key: volume
    type: slider
"#;
        let schema = SchemaLoader::new().load_str(yaml, "contact.yaml").unwrap();
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(schema.fields[1].kind, FieldKind::Other("slider".to_string()));
    }

    #[test]
    fn test_syntax_error() {
        let json = "{\n  \"fields\": [\n    {\"key\": \"a\", \"type\": \"text\"},\n  ]\n}";
        let err = SchemaLoader::new().load_str(json, "form.json").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax(_)), "got {:?}", err);
    }

    #[test]
    fn test_missing_fields_array() {
        let err = SchemaLoader::new()
            .load_str(r#"{"title": "No fields"}"#, "form.json")
            .unwrap_err();
        match err {
            SchemaError::Structure(structure) => {
                assert_eq!(structure.violation_count(), 1);
                let violation = &structure.violations()[0];
                assert!(violation.message().contains("fields"));
                assert_eq!(violation.help(), Some("Schema must contain a 'fields' array"));
            }
            other => panic!("expected structure error, got {:?}", other),
        }
    }

    #[test]
    fn test_field_without_type() {
        let json = r#"{"fields": [{"key": "a"}, {"key": "b", "type": "text", "minLength": "2"}]}"#;
        let err = SchemaLoader::new().load_str(json, "form.json").unwrap_err();
        match err {
            SchemaError::Structure(structure) => assert_eq!(structure.violation_count(), 2),
            other => panic!("expected structure error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_key_points_at_second_field() {
        let json = "{\n  \"fields\": [\n    {\"key\": \"name\", \"type\": \"text\"},\n    {\"key\": \"name2\", \"type\": \"text\"},\n    {\"key\": \"name\", \"type\": \"email\"}\n  ]\n}";
        let err = SchemaLoader::new().load_str(json, "form.json").unwrap_err();
        match err {
            SchemaError::DuplicateKey { key, span, .. } => {
                assert_eq!(key, "name");
                let third_line_start = json.rfind("{\"key\": \"name\"").unwrap();
                assert_eq!(span.offset(), third_line_start + 1);
            }
            other => panic!("expected duplicate key error, got {:?}", other),
        }
    }

    #[test]
    fn test_describe_path() {
        assert_eq!(describe_path(""), "The document");
        assert_eq!(describe_path("/fields/0"), "Field #1");
        assert_eq!(describe_path("/fields/2/options/0/value"), "'options/0/value' of field #3");
        assert_eq!(describe_path("/title"), "'/title'");
    }

    #[test]
    fn test_find_key_span() {
        let content = "{\n  \"title\": \"x\",\n  \"fields\": []\n}";
        let span = find_key_span(content, "fields").unwrap();
        assert_eq!(span.offset(), content.find("\"fields\"").unwrap());

        let yaml = "title: x\nfields: []\n";
        let span = find_key_span(yaml, "fields").unwrap();
        assert_eq!(span.offset(), 9);
    }

    #[test]
    fn test_parse_document_picks_format() {
        assert!(parse_document("a: 1", "values.yaml").is_ok());
        assert!(parse_document("a: 1", "values.json").is_err());
    }
}
