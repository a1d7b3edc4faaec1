//! `dynform fields` command - list the fields of a schema

use console::style;
use miette::Result;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{describe_constraints, load_schema, truncate_str};
use crate::cli::GlobalOpts;
use crate::render::RendererRegistry;
use crate::schema::FieldDescriptor;

#[derive(clap::Args, Debug)]
pub struct FieldsArgs {
    /// Schema file (JSON or YAML)
    pub schema: PathBuf,

    /// Render as a markdown table
    #[arg(long)]
    pub markdown: bool,
}

pub fn run(args: FieldsArgs, global: &GlobalOpts) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let registry = RendererRegistry::new();

    if let Some(title) = schema.title.as_deref().filter(|_| !global.quiet) {
        println!("{} {}", style("◆").cyan(), style(title).bold());
    }

    let mut builder = Builder::default();
    builder.push_record(["#", "Key", "Type", "Label", "Default", "Constraints", "Renderer"]);
    for (i, field) in schema.fields.iter().enumerate() {
        let renderer = if registry.supports(&field.kind) {
            "built-in"
        } else {
            "unsupported"
        };
        builder.push_record([
            (i + 1).to_string(),
            field.key.clone(),
            field.kind.to_string(),
            truncate_str(field.label.as_deref().unwrap_or(""), 30),
            default_text(field),
            describe_constraints(field),
            renderer.to_string(),
        ]);
    }

    let mut table = builder.build();
    if args.markdown {
        table.with(Style::markdown());
    } else {
        table.with(Style::modern());
    }
    println!("{}", table);

    if !global.quiet {
        println!(
            "{} field(s), submit: {}",
            style(schema.fields.len()).cyan(),
            style(schema.submit_text()).green()
        );
    }
    Ok(())
}

fn default_text(field: &FieldDescriptor) -> String {
    match &field.default_value {
        None => String::new(),
        Some(serde_json::Value::String(s)) => truncate_str(s, 20),
        Some(other) => truncate_str(&other.to_string(), 20),
    }
}
