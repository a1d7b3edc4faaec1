//! Helpers for the loosely-typed field values held by a form
//!
//! Field values are plain JSON values: strings for text-like controls,
//! numbers for numeric controls and booleans for checkboxes. These helpers
//! answer the questions validation and rendering keep asking about them.

use serde_json::{Number, Value};

/// A value counts as blank when it was never set or is the empty string
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Loose truthiness: `false`, `0`, `""` and null are falsy, everything else is truthy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0 && !x.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Canonical string form used to compare option values
///
/// `"fe"` stays `"fe"`, `1` becomes `"1"`. Null, arrays and objects have no
/// canonical form.
pub fn canonical(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text shown for a value inside an input control
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse numeric input the way a number control does
///
/// Empty or unparsable input means "not set" and becomes `""`; it is never
/// coerced to zero. Integral input is kept as an integer.
pub fn parse_number(input: &str) -> Value {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Value::String(String::new());
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!("")));
        assert!(!is_blank(&json!(" ")));
        assert!(!is_blank(&json!(false)));
        assert!(!is_blank(&json!(0)));
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("no")));
        assert!(is_truthy(&json!(-1.5)));
    }

    #[test]
    fn test_canonical() {
        assert_eq!(canonical(&json!("fe")).as_deref(), Some("fe"));
        assert_eq!(canonical(&json!(1)).as_deref(), Some("1"));
        assert_eq!(canonical(&json!(2.5)).as_deref(), Some("2.5"));
        assert_eq!(canonical(&Value::Null), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(""), json!(""));
        assert_eq!(parse_number("   "), json!(""));
        assert_eq!(parse_number("42"), json!(42));
        assert_eq!(parse_number("-3"), json!(-3));
        assert_eq!(parse_number("1.5"), json!(1.5));
        assert_eq!(parse_number("abc"), json!(""));
        assert_eq!(parse_number("NaN"), json!(""));
    }
}
