//! `dynform preview` command - render a form without prompting

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::load_schema;
use crate::cli::GlobalOpts;
use crate::form::FormEngine;
use crate::render::{render_form, RendererRegistry};

#[derive(clap::Args, Debug)]
pub struct PreviewArgs {
    /// Schema file (JSON or YAML)
    pub schema: PathBuf,
}

pub fn run(args: PreviewArgs, global: &GlobalOpts) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let engine = FormEngine::new(schema)?;
    let registry = RendererRegistry::new();

    let view = render_form(&engine, &registry)?;
    println!("{}", view);

    let unsupported = view.unsupported().count();
    if unsupported > 0 && !global.quiet {
        eprintln!();
        eprintln!(
            "{} {} field(s) have a type with no renderer",
            style("!").yellow(),
            unsupported
        );
    }
    Ok(())
}
