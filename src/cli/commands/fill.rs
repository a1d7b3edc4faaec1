//! `dynform fill` command - fill in a form interactively

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{format_values, load_schema, resolve_format};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::form::FormEngine;
use crate::render::{DialoguerPrompter, FillOutcome, FillSession, RendererRegistry};

#[derive(clap::Args, Debug)]
pub struct FillArgs {
    /// Schema file (JSON or YAML)
    pub schema: PathBuf,

    /// Write the submitted values to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: FillArgs, global: &GlobalOpts) -> Result<()> {
    if !console::user_attended() {
        return Err(miette::miette!(
            help = "Use `dynform check` to validate values non-interactively",
            "dynform fill needs an interactive terminal"
        ));
    }

    let config = Config::load();
    let schema = load_schema(&args.schema)?;
    let registry = RendererRegistry::new();
    let mut engine = FormEngine::new(schema)?.with_submit_handler(|values| {
        tracing::info!(fields = values.len(), "form submitted");
    });

    if let Some(title) = engine.schema().title.as_deref() {
        eprintln!("{} {}", style("◆").cyan(), style(title).bold());
    }
    if let Some(description) = engine.schema().description.as_deref() {
        eprintln!("{}", style(description).dim());
    }
    eprintln!();

    let mut prompter = DialoguerPrompter::new();
    let mut stderr = std::io::stderr();
    let outcome = FillSession::new(&mut engine, &registry).run(&mut prompter, &mut stderr)?;

    let FillOutcome::Submitted(values) = outcome else {
        return Ok(());
    };

    let format = resolve_format(global, &config);
    let text = format_values(&values, format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, text).into_diagnostic()?;
            if !global.quiet {
                eprintln!(
                    "{} Saved values to {}",
                    style("✓").green(),
                    style(path.display()).cyan()
                );
            }
        }
        None => print!("{}", text),
    }
    Ok(())
}
