use clap::Parser;
use dynform::cli::{Cli, Commands, GlobalOpts};
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) so piping to
    // `head` and friends does not panic on a broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global);

    match cli.command {
        Commands::Init(args) => dynform::cli::commands::init::run(args, &global),
        Commands::Preview(args) => dynform::cli::commands::preview::run(args, &global),
        Commands::Fields(args) => dynform::cli::commands::fields::run(args, &global),
        Commands::Check(args) => dynform::cli::commands::check::run(args, &global),
        Commands::Fill(args) => dynform::cli::commands::fill::run(args, &global),
        Commands::Edit(args) => dynform::cli::commands::edit::run(args, &global),
        Commands::Completions(args) => dynform::cli::commands::completions::run(args, &global),
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `--verbose`
fn init_tracing(global: &GlobalOpts) {
    let default_level = if global.verbose { "dynform=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
