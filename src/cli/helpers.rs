//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::cli::args::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::form::FormValues;
use crate::schema::{compile_pattern, FieldDescriptor, FormSchema, SchemaLoader};

/// Load a schema file, turning load failures into diagnostics
pub fn load_schema(path: &Path) -> Result<FormSchema> {
    let loader = SchemaLoader::new();
    let schema = loader.load_file(path)?;
    Ok(schema)
}

/// Pick the concrete output format
///
/// An explicit `--format` wins; `auto` falls back to the configured default
/// and then to JSON.
pub fn resolve_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    match global.format {
        OutputFormat::Auto => {
            let configured = config.default_format.as_deref().map(str::to_ascii_lowercase);
            match configured.as_deref() {
                Some("yaml") | Some("yml") => OutputFormat::Yaml,
                Some("json") | None => OutputFormat::Json,
                Some(other) => {
                    tracing::warn!(format = %other, "unknown default_format in config, using json");
                    OutputFormat::Json
                }
            }
        }
        explicit => explicit,
    }
}

/// Serialize submitted values in the requested format
pub fn format_values(values: &FormValues, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yml::to_string(values).into_diagnostic(),
        OutputFormat::Json | OutputFormat::Auto => {
            let mut text = serde_json::to_string_pretty(values).into_diagnostic()?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// One-line summary of a field's constraints, e.g. `required, 2..=50 chars`
pub fn describe_constraints(field: &FieldDescriptor) -> String {
    let mut parts = Vec::new();
    if field.required {
        parts.push("required".to_string());
    }

    let min_len = field.min_length.filter(|&n| n > 0);
    let max_len = field.max_length.filter(|&n| n > 0);
    match (min_len, max_len) {
        (Some(lo), Some(hi)) => parts.push(format!("{}..={} chars", lo, hi)),
        (Some(lo), None) => parts.push(format!(">= {} chars", lo)),
        (None, Some(hi)) => parts.push(format!("<= {} chars", hi)),
        (None, None) => {}
    }

    match (&field.min, &field.max) {
        (Some(lo), Some(hi)) => parts.push(format!("{}..={}", lo, hi)),
        (Some(lo), None) => parts.push(format!(">= {}", lo)),
        (None, Some(hi)) => parts.push(format!("<= {}", hi)),
        (None, None) => {}
    }

    if let Some(pattern) = field.pattern.as_deref().filter(|p| !p.is_empty()) {
        if compile_pattern(pattern).is_ok() {
            parts.push(format!("/{}/", pattern));
        } else {
            parts.push(format!("/{}/ (invalid, ignored)", pattern));
        }
    }
    if !field.options.is_empty() {
        parts.push(format!("{} options", field.options.len()));
    }

    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
