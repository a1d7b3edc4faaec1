//! `dynform init` command - write the demo schema to start from

use console::style;
use miette::{IntoDiagnostic, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::schema::{DocumentFormat, SchemaLoader};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// File to write (`-` for stdout); a .yaml/.yml extension writes YAML
    #[arg(default_value = "form.json")]
    pub path: PathBuf,

    /// Overwrite the file if it already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let source = SchemaLoader::demo_source()?;

    if args.path.as_os_str() == "-" {
        std::io::stdout().write_all(source.as_bytes()).into_diagnostic()?;
        return Ok(());
    }

    if args.path.exists() && !args.force {
        println!(
            "{} {} already exists",
            style("!").yellow(),
            style(args.path.display()).cyan()
        );
        println!();
        println!(
            "Use {} to overwrite it",
            style("dynform init --force").yellow()
        );
        return Err(miette::miette!("Refusing to overwrite {}", args.path.display()));
    }

    let filename = args.path.to_string_lossy();
    let contents = match DocumentFormat::from_filename(&filename) {
        DocumentFormat::Json => source,
        // Serialize the typed schema so keys keep their declared order
        DocumentFormat::Yaml => {
            let schema = SchemaLoader::new().demo_schema()?;
            serde_yml::to_string(&schema).into_diagnostic()?
        }
    };

    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    std::fs::write(&args.path, contents).into_diagnostic()?;
    tracing::debug!(path = %args.path.display(), "wrote demo schema");

    if !global.quiet {
        println!(
            "{} Wrote demo schema to {}",
            style("✓").green(),
            style(args.path.display()).cyan()
        );
        println!();
        println!("Next steps:");
        println!(
            "  {} Preview the form",
            style(format!("dynform preview {}", args.path.display())).yellow()
        );
        println!(
            "  {} Fill it in",
            style(format!("dynform fill {}", args.path.display())).yellow()
        );
        println!(
            "  {} Edit it live",
            style(format!("dynform edit {}", args.path.display())).yellow()
        );
    }
    Ok(())
}
