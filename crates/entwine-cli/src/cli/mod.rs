use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `entwine` binary.
#[derive(Debug, Parser)]
#[command(
    name = "entwine",
    version,
    about = "entwine - relational schema descriptors for code-generating ORMs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of .entwine/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Compiler-form schema file (.json or .toml) to use instead of the
    /// built-in schema
    #[arg(short, long, global = true)]
    pub schema: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
            schema: self.schema.clone(),
        }
    }
}
