//! Built-in controls for the nine standard field kinds

use chrono::NaiveDate;
use miette::Result;
use serde_json::Value;
use std::collections::HashMap;

use crate::core::value;
use crate::render::node::{Choice, Control, FieldNode, Footer, Node, SELECT_PLACEHOLDER};
use crate::render::prompt::{InputRequest, InputStyle, Prompter, DATE_FORMAT};
use crate::render::{FieldRenderer, RenderProps};
use crate::schema::field::FieldKind;

/// The built-in dispatch table
pub fn builtin_renderers() -> HashMap<FieldKind, Box<dyn FieldRenderer>> {
    let mut table: HashMap<FieldKind, Box<dyn FieldRenderer>> = HashMap::new();
    table.insert(FieldKind::Text, Box::new(InputControl::new(InputStyle::Plain)));
    table.insert(FieldKind::Email, Box::new(InputControl::new(InputStyle::Plain)));
    table.insert(FieldKind::Password, Box::new(InputControl::new(InputStyle::Masked)));
    table.insert(FieldKind::Number, Box::new(InputControl::new(InputStyle::Numeric)));
    table.insert(FieldKind::Textarea, Box::new(InputControl::new(InputStyle::Multiline)));
    table.insert(FieldKind::Date, Box::new(InputControl::new(InputStyle::Date)));
    table.insert(FieldKind::Select, Box::new(SelectControl));
    table.insert(FieldKind::Radio, Box::new(RadioControl));
    table.insert(FieldKind::Checkbox, Box::new(CheckboxControl));
    table
}

/// Footer for a field: its error when it has one, otherwise its helper text
pub fn footer(props: &RenderProps<'_>) -> Option<Footer> {
    match props.error {
        Some(err) => Some(Footer::Error(err.message())),
        None => props.field.helper_text.clone().map(Footer::Helper),
    }
}

fn field_node(props: &RenderProps<'_>, control: Control) -> Node {
    Node::Field(FieldNode {
        key: props.field.key.clone(),
        label: props.field.label.clone(),
        required: props.field.required,
        control,
        footer: footer(props),
    })
}

/// Single-line, masked, multi-line, numeric and date inputs
#[derive(Debug, Clone, Copy)]
pub struct InputControl {
    style: InputStyle,
}

impl InputControl {
    pub fn new(style: InputStyle) -> Self {
        Self { style }
    }

    /// Turn raw input into the value this control stores
    fn convert(&self, input: String) -> Value {
        match self.style {
            InputStyle::Numeric => value::parse_number(&input),
            InputStyle::Date => {
                let parsed = NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
                    .map(|date| date.format(DATE_FORMAT).to_string())
                    .unwrap_or_default();
                Value::String(parsed)
            }
            InputStyle::Plain | InputStyle::Masked | InputStyle::Multiline => Value::String(input),
        }
    }
}

impl FieldRenderer for InputControl {
    fn render(
        &self,
        props: &RenderProps<'_>,
        prompter: &mut dyn Prompter,
        set_value: &mut dyn FnMut(Value),
    ) -> Result<Node> {
        let current = value::display(props.value);
        let masked = self.style == InputStyle::Masked;

        let request = InputRequest {
            prompt: props.field.display_label(),
            initial: if masked { "" } else { current.as_str() },
            placeholder: props.field.placeholder.as_deref(),
            style: self.style,
        };
        if let Some(input) = prompter.input(&request)? {
            set_value(self.convert(input));
        }

        let text = if masked {
            "•".repeat(current.chars().count())
        } else {
            current
        };
        Ok(field_node(
            props,
            Control::Input {
                style: self.style,
                text,
                placeholder: props.field.placeholder.clone(),
            },
        ))
    }
}

/// Closed option list with a leading "no selection" entry
#[derive(Debug, Clone, Copy)]
pub struct SelectControl;

impl FieldRenderer for SelectControl {
    fn render(
        &self,
        props: &RenderProps<'_>,
        prompter: &mut dyn Prompter,
        set_value: &mut dyn FnMut(Value),
    ) -> Result<Node> {
        let field = props.field;
        let current = field.option_index(props.value);

        let mut items = vec![SELECT_PLACEHOLDER.to_string()];
        items.extend(field.options.iter().map(|opt| opt.label.clone()));

        // Entry 0 is the placeholder; option i sits at i + 1
        if let Some(idx) = prompter.choose(field.display_label(), &items, Some(current.map_or(0, |i| i + 1)))? {
            let selected = idx
                .checked_sub(1)
                .and_then(|i| field.options.get(i))
                .map(|opt| opt.value.canonical())
                .unwrap_or_default();
            set_value(Value::String(selected));
        }

        let mut choices = vec![Choice {
            label: SELECT_PLACEHOLDER.to_string(),
            value: String::new(),
            selected: current.is_none(),
        }];
        choices.extend(field.options.iter().enumerate().map(|(i, opt)| Choice {
            label: opt.label.clone(),
            value: opt.value.canonical(),
            selected: current == Some(i),
        }));

        Ok(field_node(props, Control::Select { choices }))
    }
}

/// One exclusive choice per option
#[derive(Debug, Clone, Copy)]
pub struct RadioControl;

impl FieldRenderer for RadioControl {
    fn render(
        &self,
        props: &RenderProps<'_>,
        prompter: &mut dyn Prompter,
        set_value: &mut dyn FnMut(Value),
    ) -> Result<Node> {
        let field = props.field;
        let current = field.option_index(props.value);
        let items: Vec<String> = field.options.iter().map(|opt| opt.label.clone()).collect();

        if let Some(idx) = prompter.choose(field.display_label(), &items, current)? {
            if let Some(opt) = field.options.get(idx) {
                set_value(Value::String(opt.value.canonical()));
            }
        }

        let choices = field
            .options
            .iter()
            .enumerate()
            .map(|(i, opt)| Choice {
                label: opt.label.clone(),
                value: opt.value.canonical(),
                selected: current == Some(i),
            })
            .collect();

        Ok(field_node(props, Control::Radio { choices }))
    }
}

/// Boolean toggle; the label is the toggle target
#[derive(Debug, Clone, Copy)]
pub struct CheckboxControl;

impl FieldRenderer for CheckboxControl {
    fn render(
        &self,
        props: &RenderProps<'_>,
        prompter: &mut dyn Prompter,
        set_value: &mut dyn FnMut(Value),
    ) -> Result<Node> {
        let checked = value::is_truthy(props.value);
        let label = props.field.display_label().to_string();

        if let Some(answer) = prompter.toggle(&label, checked)? {
            set_value(Value::Bool(answer));
        }

        Ok(field_node(props, Control::Checkbox { checked, label }))
    }
}
