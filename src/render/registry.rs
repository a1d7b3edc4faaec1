//! Renderer lookup: caller overrides first, then built-ins

use miette::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::render::builtin::builtin_renderers;
use crate::render::node::Node;
use crate::render::prompt::Prompter;
use crate::render::{FieldRenderer, RenderProps};
use crate::schema::field::FieldKind;

/// Maps field kinds to renderers
///
/// A kind found in the override table always wins over the built-in table.
/// Kinds found in neither render as [`Node::Unsupported`].
pub struct RendererRegistry {
    builtin: HashMap<FieldKind, Box<dyn FieldRenderer>>,
    overrides: HashMap<FieldKind, Box<dyn FieldRenderer>>,
}

impl RendererRegistry {
    /// Registry with the nine built-in controls and no overrides
    pub fn new() -> Self {
        Self {
            builtin: builtin_renderers(),
            overrides: HashMap::new(),
        }
    }

    /// Registry without built-in controls
    pub fn empty() -> Self {
        Self {
            builtin: HashMap::new(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, kind: impl Into<FieldKind>, renderer: impl FieldRenderer + 'static) -> Self {
        self.set_override(kind, Box::new(renderer));
        self
    }

    /// Install an override, returning the one it replaced
    pub fn set_override(
        &mut self,
        kind: impl Into<FieldKind>,
        renderer: Box<dyn FieldRenderer>,
    ) -> Option<Box<dyn FieldRenderer>> {
        self.overrides.insert(kind.into(), renderer)
    }

    pub fn remove_override(&mut self, kind: &FieldKind) -> Option<Box<dyn FieldRenderer>> {
        self.overrides.remove(kind)
    }

    pub fn resolve(&self, kind: &FieldKind) -> Option<&dyn FieldRenderer> {
        self.overrides
            .get(kind)
            .or_else(|| self.builtin.get(kind))
            .map(|renderer| &**renderer)
    }

    pub fn supports(&self, kind: &FieldKind) -> bool {
        self.resolve(kind).is_some()
    }

    /// Render one field, falling back to the unsupported notice
    pub fn render_field(
        &self,
        props: &RenderProps<'_>,
        prompter: &mut dyn Prompter,
        set_value: &mut dyn FnMut(Value),
    ) -> Result<Node> {
        match self.resolve(&props.field.kind) {
            Some(renderer) => renderer.render(props, prompter, set_value),
            None => {
                tracing::debug!(key = %props.field.key, kind = %props.field.kind, "no renderer for field kind");
                Ok(Node::Unsupported {
                    key: props.field.key.clone(),
                    kind: props.field.kind.to_string(),
                })
            }
        }
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overrides: Vec<&str> = self.overrides.keys().map(FieldKind::as_str).collect();
        overrides.sort_unstable();
        f.debug_struct("RendererRegistry")
            .field("builtin", &self.builtin.len())
            .field("overrides", &overrides)
            .finish()
    }
}
