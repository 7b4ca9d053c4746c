//! CLI parse: clap types for filesettings. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// filesettings CLI - Per-file formatting settings resolution
#[derive(Parser)]
#[command(name = "filesettings")]
#[command(about = "Resolve per-file formatting settings from layered providers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Do not read .editorconfig files
    #[arg(long)]
    pub no_editorconfig: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the resolved settings for a file
    Resolve {
        /// File to resolve settings for (relative to the workspace)
        path: PathBuf,
        /// Language id, overriding detection from the file name
        #[arg(long)]
        language: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show which provider supplies each property of a file
    Explain {
        /// File to explain (relative to the workspace)
        path: PathBuf,
        /// Language id, overriding detection from the file name
        #[arg(long)]
        language: Option<String>,
    },
    /// List every property with its type and default
    Properties {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate the loaded configuration
    Validate,
}
