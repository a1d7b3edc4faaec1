//! Interactive fill loop over a whole form

use console::style;
use miette::{IntoDiagnostic, Result};
use std::io::Write;

use crate::form::engine::FormEngine;
use crate::form::values::FormValues;
use crate::render::prompt::Prompter;
use crate::render::registry::RendererRegistry;
use crate::render::{edit_field, render_field};

/// How a fill session ended
#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome {
    Submitted(FormValues),
    Cancelled,
}

const RESET: usize = 1;
const CANCEL: usize = 2;

/// Walks the user through every field, then offers submit, reset or cancel
///
/// A field is prompted again as long as the edit just made leaves it with an
/// error. After a failed submit only the failing fields are prompted again.
pub struct FillSession<'a> {
    engine: &'a mut FormEngine,
    registry: &'a RendererRegistry,
}

impl<'a> FillSession<'a> {
    pub fn new(engine: &'a mut FormEngine, registry: &'a RendererRegistry) -> Self {
        Self { engine, registry }
    }

    pub fn run(&mut self, prompter: &mut dyn Prompter, out: &mut dyn Write) -> Result<FillOutcome> {
        let mut pending = self.all_keys();

        loop {
            for key in &pending {
                self.fill_field(key, prompter, out)?;
            }

            let actions = [
                self.engine.schema().submit_text().to_string(),
                "Reset".to_string(),
                "Cancel".to_string(),
            ];
            let action = if prompter.is_interactive() {
                prompter.choose("What next?", &actions, Some(0))?
            } else {
                None
            };

            match action {
                Some(RESET) => {
                    self.engine.reset();
                    writeln!(out, "{} Form reset", style("→").blue()).into_diagnostic()?;
                    pending = self.all_keys();
                }
                Some(CANCEL) => {
                    writeln!(out, "{} Cancelled", style("!").yellow()).into_diagnostic()?;
                    return Ok(FillOutcome::Cancelled);
                }
                _ => match self.engine.submit() {
                    Ok(values) => {
                        writeln!(out, "{} Form submitted", style("✓").green()).into_diagnostic()?;
                        return Ok(FillOutcome::Submitted(values));
                    }
                    Err(err) => {
                        writeln!(out, "{} {}", style("✗").red(), err).into_diagnostic()?;
                        pending = err.errors().iter().map(|e| e.key().to_string()).collect();
                        for key in &pending {
                            let node = render_field(self.engine, self.registry, key)?;
                            writeln!(out, "{}", node).into_diagnostic()?;
                        }
                        if !prompter.is_interactive() {
                            return Err(err.into());
                        }
                    }
                },
            }
        }
    }

    fn all_keys(&self) -> Vec<String> {
        self.engine.schema().keys().map(String::from).collect()
    }

    fn fill_field(&mut self, key: &str, prompter: &mut dyn Prompter, out: &mut dyn Write) -> Result<()> {
        loop {
            let edited = edit_field(self.engine, self.registry, key, prompter)?;
            let node = render_field(self.engine, self.registry, key)?;

            if node.is_unsupported() {
                writeln!(out, "{}", node).into_diagnostic()?;
                return Ok(());
            }
            match node.error() {
                Some(_) if edited => {
                    writeln!(out, "{}", node).into_diagnostic()?;
                }
                _ => return Ok(()),
            }
        }
    }
}
