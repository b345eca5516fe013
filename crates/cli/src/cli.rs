//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Committer - build, inspect and drive composite committer configurations
#[derive(Parser, Debug)]
#[command(
    name = "committer",
    author,
    version,
    about = "Composite committer configuration tool",
    long_about = "Loads a tree of committers from a TOML or JSON configuration.\n\n\
                  Validates and prints committer trees, regenerates configuration \n\
                  from the live tree, and submits documents through it."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "COMMITTER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "COMMITTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "COMMITTER_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a committer configuration without running it
    Validate(ValidateArgs),

    /// Display the committer tree of a configuration
    Info(InfoArgs),

    /// Load a configuration and write it back out from the live tree
    Regenerate(RegenerateArgs),

    /// Queue every file of a directory through the committers, then commit
    Submit(SubmitArgs),
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "committers.toml", env = "COMMITTER_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "committers.toml", env = "COMMITTER_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show committer-specific fields
    #[arg(long)]
    pub params: bool,
}

/// Arguments for the `regenerate` command
#[derive(Parser, Debug)]
pub struct RegenerateArgs {
    /// Path to the source configuration file
    #[arg(short, long, default_value = "committers.toml", env = "COMMITTER_CONFIG")]
    pub config: PathBuf,

    /// Output file (format from extension: .toml / .json)
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the `submit` command
#[derive(Parser, Debug, Clone)]
pub struct SubmitArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "committers.toml", env = "COMMITTER_CONFIG")]
    pub config: PathBuf,

    /// Directory whose files are submitted (not recursive)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Queue removals instead of additions
    #[arg(long)]
    pub remove: bool,

    /// Commit after this many documents (0 = commit once at the end)
    #[arg(long, default_value = "0", env = "COMMITTER_BATCH_SIZE")]
    pub batch_size: usize,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
