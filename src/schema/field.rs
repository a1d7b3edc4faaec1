//! Field descriptors - one input of a form

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

use crate::core::value;

/// The kind of control a field renders as
///
/// Unknown kinds are preserved as [`FieldKind::Other`] so they can still be
/// rendered by a caller-supplied renderer, or shown as unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Number,
    Textarea,
    Select,
    Checkbox,
    Date,
    Radio,
    Other(String),
}

impl FieldKind {
    /// All kinds with a built-in control
    pub fn builtin() -> [FieldKind; 9] {
        [
            FieldKind::Text,
            FieldKind::Email,
            FieldKind::Password,
            FieldKind::Number,
            FieldKind::Textarea,
            FieldKind::Select,
            FieldKind::Checkbox,
            FieldKind::Date,
            FieldKind::Radio,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Number => "number",
            FieldKind::Textarea => "textarea",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Date => "date",
            FieldKind::Radio => "radio",
            FieldKind::Other(name) => name,
        }
    }

    /// Whether values of this kind are picked from `options`
    pub fn has_options(&self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::Radio)
    }
}

impl From<String> for FieldKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => FieldKind::Text,
            "email" => FieldKind::Email,
            "password" => FieldKind::Password,
            "number" => FieldKind::Number,
            "textarea" => FieldKind::Textarea,
            "select" => FieldKind::Select,
            "checkbox" => FieldKind::Checkbox,
            "date" => FieldKind::Date,
            "radio" => FieldKind::Radio,
            _ => FieldKind::Other(s),
        }
    }
}

impl From<&str> for FieldKind {
    fn from(s: &str) -> Self {
        FieldKind::from(s.to_string())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a select/radio option: a string or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Number(Number),
}

impl OptionValue {
    /// The string form values are stored and compared as
    pub fn canonical(&self) -> String {
        match self {
            OptionValue::Text(s) => s.clone(),
            OptionValue::Number(n) => n.to_string(),
        }
    }
}

/// A labelled choice for select and radio fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: OptionValue,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: OptionValue::Text(value.into()),
        }
    }
}

/// Describes one input of the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Unique key; used as the result-object key
    pub key: String,

    #[serde(rename = "type")]
    pub kind: FieldKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, rename = "helper", alias = "helperText", skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Regular expression the string value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl FieldDescriptor {
    pub fn new(key: impl Into<String>, kind: impl Into<FieldKind>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
            label: None,
            placeholder: None,
            helper_text: None,
            required: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
            default_value: None,
            options: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn helper(mut self, helper: impl Into<String>) -> Self {
        self.helper_text = Some(helper.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: impl Into<Number>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<Number>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(FieldOption::new(label, value));
        self
    }

    /// The value this field starts with
    ///
    /// `defaultValue` when present, otherwise `false` for checkboxes and the
    /// empty string for everything else.
    pub fn initial_value(&self) -> Value {
        match &self.default_value {
            Some(default) => self.normalize(default.clone()),
            None if self.kind == FieldKind::Checkbox => Value::Bool(false),
            None => Value::String(String::new()),
        }
    }

    /// Bring a value into the form this field stores it in
    ///
    /// Select and radio fields store option values as canonical strings.
    pub fn normalize(&self, value: Value) -> Value {
        match value {
            Value::Number(n) if self.kind.has_options() => Value::String(n.to_string()),
            other => other,
        }
    }

    /// Label shown to the user, falling back to the key
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    /// Position of the option matching `value`, compared in canonical form
    pub fn option_index(&self, value: &Value) -> Option<usize> {
        let wanted = value::canonical(value)?;
        self.options.iter().position(|opt| opt.value.canonical() == wanted)
    }
}
