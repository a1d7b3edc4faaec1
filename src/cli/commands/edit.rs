//! `dynform edit` command - live schema editing
//!
//! Opens the schema in the configured editor. After each save the schema is
//! reloaded into the same engine and either the load diagnostic or the
//! rendered form is shown, until the user is done.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::form::FormEngine;
use crate::render::{render_form, RendererRegistry};
use crate::schema::{FormSchema, SchemaLoader};

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Schema file (created from the demo schema if missing)
    pub schema: PathBuf,

    /// Replace the file with the demo schema before editing
    #[arg(long)]
    pub reset: bool,
}

pub fn run(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    if !console::user_attended() {
        return Err(miette::miette!("dynform edit needs an interactive terminal"));
    }

    let config = Config::load();
    let loader = SchemaLoader::new();
    let registry = RendererRegistry::new();

    if args.reset || !args.schema.exists() {
        std::fs::write(&args.schema, SchemaLoader::demo_source()?).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Wrote demo schema to {}",
                style("✓").green(),
                style(args.schema.display()).cyan()
            );
        }
    }

    let mut engine = FormEngine::new(FormSchema::default())?;
    let filename = args.schema.to_string_lossy().to_string();

    loop {
        println!(
            "Opening {} in {}...",
            style(args.schema.display()).cyan(),
            style(config.editor()).yellow()
        );
        let status = config.run_editor(&args.schema).into_diagnostic()?;
        if !status.success() {
            return Err(miette::miette!("Editor exited with {}", status));
        }

        let content = std::fs::read_to_string(&args.schema).into_diagnostic()?;
        match loader.load_str(&content, &filename) {
            Ok(schema) => match engine.load_schema(schema) {
                Ok(()) => {
                    let view = render_form(&engine, &registry)?;
                    println!();
                    println!("{}", view);
                    println!();
                }
                Err(err) => eprintln!("{:?}", miette::Report::new(err)),
            },
            Err(err) => eprintln!("{:?}", miette::Report::new(err)),
        }

        let again = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Edit again?")
            .default(true)
            .interact()
            .into_diagnostic()?;
        if !again {
            break;
        }
    }

    if !global.quiet {
        println!(
            "{} {} field(s) in {}",
            style("✓").green(),
            engine.schema().fields.len(),
            style(args.schema.display()).cyan()
        );
    }
    Ok(())
}
