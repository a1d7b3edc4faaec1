//! Document syntax diagnostics with source-annotated error messages

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::Path;
use thiserror::Error;

/// Text formats a schema or values document can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Guess the format from a file name; anything not `.yaml`/`.yml` is JSON
    pub fn from_filename(name: &str) -> Self {
        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "JSON",
            DocumentFormat::Yaml => "YAML",
        }
    }
}

/// Syntax error in a JSON or YAML document, with source location
#[derive(Debug, Error, Diagnostic)]
#[error("{kind} syntax error: {message}")]
#[diagnostic(code(dynform::document::syntax))]
pub struct DocumentSyntaxError {
    kind: &'static str,
    message: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("parser stopped here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,
}

impl DocumentSyntaxError {
    pub fn from_json_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        Self::at_location(
            DocumentFormat::Json,
            err.to_string(),
            source,
            filename,
            err.line(),
            err.column(),
        )
    }

    pub fn from_yaml_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = match err.location() {
            Some(loc) => (loc.line(), loc.column()),
            None => (1, 1),
        };
        Self::at_location(DocumentFormat::Yaml, err.to_string(), source, filename, line, column)
    }

    /// Point at a 1-based line and column of `source`
    pub fn at_location(
        format: DocumentFormat,
        message: impl Into<String>,
        source: &str,
        filename: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let message = message.into();
        let offset = byte_offset(source, line, column);
        let len = usize::from(offset < source.len());

        Self {
            kind: format.as_str(),
            help: syntax_hint(format, &message),
            src: NamedSource::new(filename, source.to_string()),
            span: (offset, len).into(),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte offset of a 1-based line/column position, clamped to the source
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let mut start = 0;
    for text in source.split_inclusive('\n').take(line.max(1) - 1) {
        start += text.len();
    }
    let rest = &source[start..];
    let line_text = rest.split('\n').next().unwrap_or("");
    let within = line_text
        .char_indices()
        .nth(column.max(1) - 1)
        .map_or(line_text.len(), |(i, _)| i);
    start + within
}

/// Known parser messages and how to fix them
const JSON_HINTS: &[(&str, &str)] = &[
    ("trailing comma", "Remove the comma after the last item of the list or object"),
    ("expected `,`", "Separate items with commas: [item1, item2, item3]"),
    ("key must be a string", "Object keys need double quotes in JSON: {\"key\": \"value\"}"),
    ("eof while parsing", "The document ends early; look for a missing closing bracket or brace"),
];

const YAML_HINTS: &[(&str, &str)] = &[
    ("tab", "Indent with spaces; YAML does not allow tabs"),
    ("duplicate", "A key appears twice in the same mapping; remove or rename one"),
    ("mapping values are not allowed", "Check the indentation, and that every ':' is followed by a space"),
];

fn syntax_hint(format: DocumentFormat, message: &str) -> Option<String> {
    let hints = match format {
        DocumentFormat::Json => JSON_HINTS,
        DocumentFormat::Yaml => YAML_HINTS,
    };
    let lower = message.to_lowercase();
    hints
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, hint)| hint.to_string())
}
