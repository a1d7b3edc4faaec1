//! `dynform check` command - validate a values document against a schema

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{format_values, load_schema, resolve_format};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::form::FormEngine;
use crate::schema::loader::parse_document;

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Schema file (JSON or YAML)
    pub schema: PathBuf,

    /// Values document: an object mapping field keys to values
    pub values: PathBuf,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let schema = load_schema(&args.schema)?;
    let mut engine = FormEngine::new(schema)?;

    let content = std::fs::read_to_string(&args.values).into_diagnostic()?;
    let filename = args.values.to_string_lossy();
    let document = parse_document(&content, &filename)?;
    let serde_json::Value::Object(entries) = document else {
        return Err(miette::miette!(
            help = "Write the values as a mapping, e.g. {\"name\": \"Al\"}",
            "Values document must contain an object of field values ({})",
            args.values.display()
        ));
    };

    for (key, value) in entries {
        if engine.schema().field(&key).is_none() {
            tracing::debug!(key = %key, "ignoring value for unknown field");
            if !global.quiet {
                eprintln!(
                    "{} Ignoring '{}': no such field in {}",
                    style("!").yellow(),
                    key,
                    args.schema.display()
                );
            }
            continue;
        }
        engine.set_field_value(&key, value)?;
    }

    match engine.submit() {
        Ok(values) => {
            print!("{}", format_values(&values, resolve_format(global, &config))?);
            if !global.quiet {
                eprintln!("{} All fields valid", style("✓").green().bold());
            }
            Ok(())
        }
        Err(err) => {
            if !global.quiet {
                for field_error in err.errors() {
                    eprintln!(
                        "{} {} - {}",
                        style("✗").red(),
                        style(field_error.key()).cyan(),
                        field_error.message()
                    );
                }
                eprintln!();
            }
            Err(err.into())
        }
    }
}
