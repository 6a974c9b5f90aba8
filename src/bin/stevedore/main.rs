//! Stevedore CLI - builds CMake-based native extensions for Python packages

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stevedore::builder::BuildError;
use stevedore::util::diagnostic::emit;
use stevedore::util::shell::{ColorChoice, Shell};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let shell = Shell::from_flags(cli.quiet, cli.verbose, color);

    if let Err(e) = run(cli, &shell) {
        match e.downcast_ref::<BuildError>() {
            Some(err) => emit(&err.to_diagnostic(), shell.use_color()),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, shell: &Shell) -> Result<()> {
    // Set up logging
    let default_filter = if cli.verbose {
        "stevedore=debug"
    } else if cli.quiet {
        "stevedore=warn"
    } else {
        "stevedore=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout is reserved for `plan` and `purity` output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, shell),
        Commands::Plan(args) => commands::plan::execute(args),
        Commands::Purity(args) => commands::purity::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
