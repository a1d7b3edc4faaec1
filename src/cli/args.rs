//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    check::CheckArgs, completions::CompletionsArgs, edit::EditArgs, fields::FieldsArgs,
    fill::FillArgs, init::InitArgs, preview::PreviewArgs,
};

#[derive(Parser)]
#[command(name = "dynform")]
#[command(author, version, about = "Schema-driven forms in the terminal")]
#[command(long_about = "Load a JSON or YAML form schema, render its fields, validate values and collect submissions.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format for submitted values
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the demo schema to start from
    Init(InitArgs),

    /// Render a form without prompting
    Preview(PreviewArgs),

    /// List the fields of a schema
    Fields(FieldsArgs),

    /// Validate a values document against a schema
    Check(CheckArgs),

    /// Fill in a form interactively
    Fill(FillArgs),

    /// Edit a schema and preview it after each save
    Edit(EditArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default, or JSON
    #[default]
    Auto,
    /// JSON object (for programming)
    Json,
    /// YAML mapping (for humans)
    Yaml,
}
