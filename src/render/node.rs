//! Rendered form nodes and their terminal presentation

use console::style;
use std::fmt;

use crate::render::prompt::InputStyle;

/// Text of the always-present "no selection" entry of a select control
pub const SELECT_PLACEHOLDER: &str = "Select an option";

/// The visual result of rendering one field
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Field(FieldNode),
    /// The field's kind has no renderer
    Unsupported { key: String, kind: String },
}

impl Node {
    pub fn key(&self) -> &str {
        match self {
            Node::Field(field) => &field.key,
            Node::Unsupported { key, .. } => key,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Node::Unsupported { .. })
    }

    /// The field's error, if the node shows one
    pub fn error(&self) -> Option<&str> {
        match self {
            Node::Field(FieldNode {
                footer: Some(Footer::Error(msg)),
                ..
            }) => Some(msg.as_str()),
            _ => None,
        }
    }
}

/// A rendered field: label, control and footer line
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub key: String,
    pub label: Option<String>,
    pub required: bool,
    pub control: Control,
    pub footer: Option<Footer>,
}

/// The control part of a field node
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Input {
        style: InputStyle,
        /// Text as shown (already masked for passwords)
        text: String,
        placeholder: Option<String>,
    },
    Select {
        choices: Vec<Choice>,
    },
    Radio {
        choices: Vec<Choice>,
    },
    Checkbox {
        checked: bool,
        label: String,
    },
    /// Free-form lines produced by a caller-supplied renderer
    Custom {
        lines: Vec<String>,
    },
}

/// One entry of a select or radio control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

/// Line under a control: the error replaces the helper text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    Helper(String),
    Error(String),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Field(field) => fmt::Display::fmt(field, f),
            Node::Unsupported { kind, .. } => write!(
                f,
                "{} {}",
                style("✗").red(),
                style(format!("Unsupported field type: {}", kind)).red()
            ),
        }
    }
}

impl fmt::Display for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Checkboxes carry their label on the control line
        if !matches!(self.control, Control::Checkbox { .. }) {
            if let Some(label) = &self.label {
                write!(f, "{}", style(label).bold())?;
                if self.required {
                    write!(f, " {}", style("*").red())?;
                }
                writeln!(f)?;
            }
        }

        write!(f, "{}", self.control)?;

        match &self.footer {
            Some(Footer::Error(msg)) => write!(f, "\n  {} {}", style("✗").red(), style(msg).red())?,
            Some(Footer::Helper(msg)) => write!(f, "\n  {}", style(msg).dim())?,
            None => {}
        }
        Ok(())
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Input {
                style: input_style,
                text,
                placeholder,
            } => {
                let marker = match input_style {
                    InputStyle::Multiline => "│",
                    _ => ">",
                };
                if text.is_empty() {
                    let hint = placeholder.as_deref().unwrap_or("");
                    write!(f, "  {} {}", style(marker).cyan(), style(hint).dim())
                } else {
                    let mut lines = text.lines();
                    let first = lines.next().unwrap_or("");
                    write!(f, "  {} {}", style(marker).cyan(), first)?;
                    for line in lines {
                        write!(f, "\n  {} {}", style(marker).cyan(), line)?;
                    }
                    Ok(())
                }
            }
            Control::Select { choices } => {
                match choices.iter().find(|c| c.selected) {
                    Some(choice) if !choice.value.is_empty() => {
                        write!(f, "  {} {}", style("▾").cyan(), choice.label)?
                    }
                    _ => write!(f, "  {} {}", style("▾").cyan(), style(SELECT_PLACEHOLDER).dim())?,
                }
                let options: Vec<&str> = choices
                    .iter()
                    .filter(|c| !c.value.is_empty())
                    .map(|c| c.label.as_str())
                    .collect();
                if !options.is_empty() {
                    write!(f, "  {}", style(format!("[{}]", options.join(" | "))).dim())?;
                }
                Ok(())
            }
            Control::Radio { choices } => {
                write!(f, " ")?;
                for choice in choices {
                    let mark = if choice.selected { "(•)" } else { "( )" };
                    write!(f, " {} {}", style(mark).cyan(), choice.label)?;
                }
                Ok(())
            }
            Control::Checkbox { checked, label } => {
                let mark = if *checked { "[x]" } else { "[ ]" };
                write!(f, "  {} {}", style(mark).cyan(), label)
            }
            Control::Custom { lines } => {
                let body: Vec<String> = lines.iter().map(|l| format!("  {}", l)).collect();
                write!(f, "{}", body.join("\n"))
            }
        }
    }
}
