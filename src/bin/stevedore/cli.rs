//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

/// Stevedore - builds CMake-based native extensions for Python packages
#[derive(Parser)]
#[command(name = "stevedore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print nothing but errors (wins over --verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure, build and install the extension into the staging tree
    Build(BuildArgs),

    /// Print the derived build plan as JSON without running it
    Plan(BuildArgs),

    /// Print whether the package is platform-independent
    Purity(PurityArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Root of the CMake project (contains Stevedore.toml)
    #[arg(long, default_value = ".")]
    pub source: PathBuf,

    /// Temporary build tree
    #[arg(long)]
    pub build_temp: PathBuf,

    /// Staging library tree the install step writes into
    #[arg(long)]
    pub build_lib: PathBuf,

    /// Python interpreter to build against
    #[arg(long)]
    pub python: Option<PathBuf>,

    /// CMake executable
    #[arg(long)]
    pub cmake: Option<PathBuf>,
}

#[derive(Args)]
pub struct PurityArgs {
    /// Root of the CMake project (contains Stevedore.toml)
    #[arg(long, default_value = ".")]
    pub source: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}
