//! Command-line interface definitions and parsing
//!
//! # Commands
//!
//! - **create**: scan for media files and write a batchfile from their tags
//! - **write**: run the batchfile, previewing and tagging each file
//! - **edit**: open the batchfile in an editor
//! - **config**: read and change settings
//! - **completions**: print shell completions
//!
//! Running without a subcommand is the same as `write`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mfbatch")]
#[command(about = "Tag media files in batches from an editable script", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Change to this directory before doing anything else
    #[arg(short = 'p', long = "path", value_name = "DIR", global = true)]
    pub path: Option<PathBuf>,

    /// Batchfile to create, edit or run (overrides config)
    #[arg(short = 'f', long = "batchfile", value_name = "FILE", global = true)]
    pub batchfile: Option<PathBuf>,

    /// Suppress informational output
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log diagnostics to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

/// Options for running a batchfile
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteArgs {
    /// Show what would be written without touching any file
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Write every file without asking
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan the current directory and write a batchfile from the files' tags
    #[command(visible_alias = "c")]
    Create {
        /// Open the new batchfile in an editor afterwards
        #[arg(short = 'e', long = "edit")]
        edit: bool,
    },

    /// Run the batchfile (default)
    #[command(visible_alias = "w")]
    Write {
        #[command(flatten)]
        args: WriteArgs,
    },

    /// Open the batchfile in an editor
    #[command(visible_alias = "e")]
    Edit,

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., extensions=flac,ogg)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., batchfile)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the configuration file location
    Path,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to Write if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Write {
            args: WriteArgs::default(),
        })
    }
}

/// Split `key=value`, trimming both sides
#[must_use]
pub fn split_setting(setting: &str) -> Option<(&str, &str)> {
    setting
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
}
