//! CLI argument parsing for hydrabot.
//!
//! Uses clap derive macros for declarative argument definitions.
//! Implementations live in the `commands` module.

use clap::{Parser, Subcommand, ValueEnum};
use hydrabot::config::FILE_NAME;
use std::path::PathBuf;

/// Hydrabot: resolve and normalize repository automation configuration.
///
/// Reads `.github/hydrabot.yml`, validates it, and prints the canonical rule
/// list that legacy (`version: 1`) and current documents normalize to.
#[derive(Parser, Debug)]
#[command(name = "hydrabot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log at debug level (overridden by HYDRABOT_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for hydrabot.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate and normalize a configuration file on disk.
    ///
    /// Exits with status 2 when the file has errors.
    Check(CheckArgs),

    /// Resolve configuration for an event against a local git repository.
    ///
    /// Pull request events read the head branch's configuration when the
    /// pull request adds or modifies it.
    Resolve(ResolveArgs),
}

/// Output format for resolved settings.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Configuration file to check.
    #[arg(default_value = FILE_NAME)]
    pub file: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

/// Arguments for the `resolve` command.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Path inside the git repository.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Branch holding the base configuration.
    #[arg(long, default_value = "main", env = "HYDRABOT_DEFAULT_BRANCH")]
    pub default_branch: String,

    /// Event category (e.g., issues, pull_request, schedule).
    #[arg(short, long)]
    pub event: String,

    /// Event action (e.g., opened).
    #[arg(short, long)]
    pub action: Option<String>,

    /// Pull request number; requires --base and --head.
    #[arg(long, requires_all = ["base", "head"])]
    pub pull: Option<u64>,

    /// Base revision of the pull request.
    #[arg(long)]
    pub base: Option<String>,

    /// Head revision of the pull request.
    #[arg(long)]
    pub head: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
