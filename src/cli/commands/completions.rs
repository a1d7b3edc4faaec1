//! `dynform completions` command - shell completion scripts
//!
//! The script goes to stdout. When stdout is a terminal the user most likely
//! wanted to know how to install it, so a one-line hint follows on stderr.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use console::{style, Term};
use miette::Result;
use std::io;

use crate::cli::{Cli, GlobalOpts};

const BIN_NAME: &str = "dynform";

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs, global: &GlobalOpts) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, BIN_NAME, &mut io::stdout());

    if !global.quiet && Term::stdout().is_term() {
        if let Some(hint) = install_hint(args.shell) {
            eprintln!();
            eprintln!("{} To enable completions: {}", style("→").blue(), style(hint).yellow());
        }
    }
    Ok(())
}

/// How to load the generated script in `shell`
fn install_hint(shell: Shell) -> Option<String> {
    let hint = match shell {
        Shell::Bash => format!("echo 'source <({BIN_NAME} completions bash)' >> ~/.bashrc"),
        Shell::Zsh => format!("echo 'source <({BIN_NAME} completions zsh)' >> ~/.zshrc"),
        Shell::Fish => {
            format!("{BIN_NAME} completions fish > ~/.config/fish/completions/{BIN_NAME}.fish")
        }
        Shell::PowerShell => {
            format!("{BIN_NAME} completions powershell | Out-String | Invoke-Expression")
        }
        Shell::Elvish => format!("eval ({BIN_NAME} completions elvish | slurp)"),
        _ => return None,
    };
    Some(hint)
}
