//! Field rendering
//!
//! Every field is rendered by a [`FieldRenderer`] chosen from a
//! [`RendererRegistry`]. A renderer receives the field, its current value and
//! error, a [`Prompter`] to collect edits with, and a setter to report new
//! values through. It returns a [`Node`] describing what the field looks like.

pub mod builtin;
pub mod node;
pub mod prompt;
pub mod registry;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use node::{Choice, Control, FieldNode, Footer, Node};
pub use prompt::{DialoguerPrompter, InputRequest, InputStyle, Prompter, StaticPrompter};
pub use registry::RendererRegistry;
pub use session::{FillOutcome, FillSession};

use console::style;
use miette::Result;
use serde_json::Value;
use std::fmt;

use crate::form::engine::{FormEngine, FormError};
use crate::schema::field::FieldDescriptor;
use crate::schema::validator::FieldError;

static NULL: Value = Value::Null;

/// What a renderer gets to see of its field
#[derive(Debug, Clone, Copy)]
pub struct RenderProps<'a> {
    pub field: &'a FieldDescriptor,
    pub value: &'a Value,
    pub error: Option<&'a FieldError>,
}

/// Renders one kind of field
pub trait FieldRenderer {
    /// Render the field, calling `set_value` once per edit the prompter produced
    fn render(
        &self,
        props: &RenderProps<'_>,
        prompter: &mut dyn Prompter,
        set_value: &mut dyn FnMut(Value),
    ) -> Result<Node>;
}

/// A renderer backed by a closure, see [`from_fn`]
pub struct FnRenderer<F>(F);

/// Build a renderer from a closure
pub fn from_fn<F>(f: F) -> FnRenderer<F>
where
    F: Fn(&RenderProps<'_>, &mut dyn Prompter, &mut dyn FnMut(Value)) -> Result<Node>,
{
    FnRenderer(f)
}

impl<F> FieldRenderer for FnRenderer<F>
where
    F: Fn(&RenderProps<'_>, &mut dyn Prompter, &mut dyn FnMut(Value)) -> Result<Node>,
{
    fn render(
        &self,
        props: &RenderProps<'_>,
        prompter: &mut dyn Prompter,
        set_value: &mut dyn FnMut(Value),
    ) -> Result<Node> {
        (self.0)(props, prompter, set_value)
    }
}

/// Render one field as it currently stands, without editing it
pub fn render_field(engine: &FormEngine, registry: &RendererRegistry, key: &str) -> Result<Node> {
    let field = engine
        .schema()
        .field(key)
        .ok_or_else(|| FormError::UnknownField { key: key.to_string() })?;

    let props = RenderProps {
        field,
        value: engine.value(key).unwrap_or(&NULL),
        error: engine.error(key),
    };
    registry.render_field(&props, &mut StaticPrompter, &mut |_| {})
}

/// Let the user edit one field
///
/// Edits reported by the renderer are applied through
/// [`FormEngine::set_field_value`], so the field is re-validated on each one.
/// Returns whether any edit was made.
pub fn edit_field(
    engine: &mut FormEngine,
    registry: &RendererRegistry,
    key: &str,
    prompter: &mut dyn Prompter,
) -> Result<bool> {
    let field = engine
        .schema()
        .field(key)
        .cloned()
        .ok_or_else(|| FormError::UnknownField { key: key.to_string() })?;
    let value = engine.value(key).cloned().unwrap_or(Value::Null);
    let error = engine.error(key).cloned();

    let mut edits = Vec::new();
    let props = RenderProps {
        field: &field,
        value: &value,
        error: error.as_ref(),
    };
    registry.render_field(&props, prompter, &mut |v| edits.push(v))?;

    let edited = !edits.is_empty();
    for edit in edits {
        engine.set_field_value(key, edit)?;
    }
    Ok(edited)
}

/// A whole form, rendered
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub title: Option<String>,
    pub description: Option<String>,
    pub nodes: Vec<Node>,
    pub submit_text: String,
}

impl FormView {
    /// Nodes whose field kind had no renderer
    pub fn unsupported(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_unsupported())
    }
}

/// Render every field of the form in schema order
pub fn render_form(engine: &FormEngine, registry: &RendererRegistry) -> Result<FormView> {
    let schema = engine.schema();
    let nodes = schema
        .keys()
        .map(|key| render_field(engine, registry, key))
        .collect::<Result<Vec<_>>>()?;

    Ok(FormView {
        title: schema.title.clone(),
        description: schema.description.clone(),
        nodes,
        submit_text: schema.submit_text().to_string(),
    })
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = style("─".repeat(50)).dim();

        if let Some(title) = &self.title {
            writeln!(f, "{} {}", style("◆").cyan(), style(title).bold())?;
        }
        if let Some(description) = &self.description {
            writeln!(f, "{}", style(description).dim())?;
        }
        writeln!(f, "{}", rule)?;

        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", node)?;
        }

        writeln!(f, "{}", rule)?;
        write!(
            f,
            "{}  {}",
            style(format!("[ {} ]", self.submit_text)).green().bold(),
            style("[ Reset ]").dim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Answer, ScriptedPrompter};
    use crate::schema::form::FormSchema;
    use serde_json::json;

    fn engine() -> FormEngine {
        FormEngine::new(
            FormSchema::new(vec![
                FieldDescriptor::new("name", "text")
                    .label("Name")
                    .required()
                    .min_length(2),
                FieldDescriptor::new("volume", "slider").label("Volume"),
                FieldDescriptor::new("newsletter", "checkbox")
                    .label("Subscribe")
                    .default_value(true),
            ])
            .with_title("Sign up")
            .with_submit_text("Create account"),
        )
        .unwrap()
    }

    fn plain(text: impl ToString) -> String {
        console::strip_ansi_codes(&text.to_string()).to_string()
    }

    #[test]
    fn test_edit_field_applies_edit_and_validates() {
        let mut engine = engine();
        let registry = RendererRegistry::new();
        let mut prompter = ScriptedPrompter::new(vec![Answer::Text("A")]);

        let edited = edit_field(&mut engine, &registry, "name", &mut prompter).unwrap();
        assert!(edited);
        assert_eq!(engine.value("name"), Some(&json!("A")));
        assert_eq!(engine.error("name").unwrap().message(), "Minimum 2 characters");

        let node = render_field(&engine, &registry, "name").unwrap();
        assert_eq!(node.error(), Some("Minimum 2 characters"));
    }

    #[test]
    fn test_edit_field_without_edit() {
        let mut engine = engine();
        let registry = RendererRegistry::new();
        let mut prompter = ScriptedPrompter::new(vec![Answer::Skip]);

        assert!(!edit_field(&mut engine, &registry, "name", &mut prompter).unwrap());
        assert!(!engine.has_errors());
    }

    #[test]
    fn test_edit_unknown_field_fails() {
        let mut engine = engine();
        let registry = RendererRegistry::new();
        let mut prompter = ScriptedPrompter::new(vec![]);
        assert!(edit_field(&mut engine, &registry, "nope", &mut prompter).is_err());
        assert!(render_field(&engine, &registry, "nope").is_err());
    }

    #[test]
    fn test_render_form_keeps_going_past_unsupported_fields() {
        let engine = engine();
        let view = render_form(&engine, &RendererRegistry::new()).unwrap();

        assert_eq!(view.nodes.len(), 3);
        assert_eq!(view.unsupported().count(), 1);
        assert_eq!(view.nodes[2].key(), "newsletter");

        let text = plain(&view);
        assert!(text.starts_with("◆ Sign up\n"));
        assert!(text.contains("Unsupported field type: slider"));
        assert!(text.contains("[x] Subscribe"));
        assert!(text.ends_with("[ Create account ]  [ Reset ]"));
    }

    #[test]
    fn test_override_fills_in_unsupported_kind() {
        let engine = engine();
        let registry = RendererRegistry::new().with_override(
            "slider",
            from_fn(|props, _, _| {
                Ok(Node::Field(FieldNode {
                    key: props.field.key.clone(),
                    label: props.field.label.clone(),
                    required: false,
                    control: Control::Custom {
                        lines: vec!["|----o-----|".to_string()],
                    },
                    footer: None,
                }))
            }),
        );
        let view = render_form(&engine, &registry).unwrap();
        assert_eq!(view.unsupported().count(), 0);
        assert!(plain(&view).contains("Volume\n  |----o-----|"));
    }
}
