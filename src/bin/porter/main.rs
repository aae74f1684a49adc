//! porter CLI - map container images and OS packages onto a curated distro

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use porter::matcher::MatchError;
use porter::util::diagnostic;
use porter::util::Shell;

/// Options shared by every command.
pub struct GlobalOptions {
    pub shell: Shell,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("porter=debug")
    } else if cli.quiet {
        EnvFilter::new("porter=error")
    } else {
        EnvFilter::new("porter=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global_opts = GlobalOptions {
        shell: Shell::from_flags(
            cli.quiet,
            cli.verbose,
            cli.color,
            cli.message_format == MessageFormat::Json,
        ),
    };

    if let Err(e) = run(cli.command, &global_opts) {
        report_error(&e, &global_opts.shell);
        std::process::exit(1);
    }
}

fn run(command: Commands, global_opts: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Tag(args) => commands::tag::execute(args, global_opts),
        Commands::Packages(args) => commands::packages::execute(args, global_opts),
        Commands::Image(args) => commands::image::execute(args, global_opts),
        Commands::Search(args) => commands::search::execute(args, global_opts),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn report_error(e: &anyhow::Error, shell: &Shell) {
    if shell.is_json() {
        shell.error(format!("{:#}", e));
        return;
    }

    match e.downcast_ref::<MatchError>() {
        Some(err) => diagnostic::emit(&err.to_diagnostic(), shell.use_color()),
        None => eprintln!("error: {:#}", e),
    }
}
