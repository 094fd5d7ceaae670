//! mfbatch CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # List every FLAC file below the music folder with its current tags
//! mfbatch -p ~/Music/Album create
//!
//! # Edit the generated batchfile
//! mfbatch edit
//!
//! # Preview and write, asking for each file
//! mfbatch write
//!
//! # Show what would be written without asking
//! mfbatch write -n -y
//! ```
//!
//! # Configuration
//!
//! Settings are read from the user's config directory
//! (`~/.config/mfbatch/config.toml` on Linux) and `MFBATCH_*` variables.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::CommandFactory;
use colored::Colorize;
use mfbatch::{
    MfbatchError, Result,
    batch::RunOptions,
    cli::{Cli, Commands},
    commands,
    config::MfbatchConfig,
    logging,
    tags::Metaflac,
};

fn run() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init_logging(cli.verbose);

    let command = cli.get_command();
    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "mfbatch", &mut io::stdout());
        return Ok(());
    }

    if let Some(dir) = &cli.path {
        std::env::set_current_dir(dir).map_err(|e| {
            MfbatchError::InvalidInput(format!("Cannot change to {}: {e}", dir.display()))
        })?;
    }

    let mut config = MfbatchConfig::load()?;
    let quiet = cli.quiet || config.quiet;
    let batchfile = cli
        .batchfile
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.batchfile));
    let store = Metaflac::new(config.metaflac_program());

    match command {
        Commands::Create { edit } => {
            commands::create(&batchfile, &store, &config.extensions, quiet)?;
            if edit {
                commands::edit(&batchfile, config.editor.as_deref())?;
            }
        }
        Commands::Write { args } => {
            let options = RunOptions {
                dry_run: args.dry_run,
                interactive: !args.yes,
                quiet,
                width: config.wrap_width,
            };
            commands::write(&batchfile, &store, options)?;
        }
        Commands::Edit => commands::edit(&batchfile, config.editor.as_deref())?,
        Commands::Config { command } => commands::settings(&mut config, &command, quiet)?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Main entry point for the mfbatch application
///
/// Any error is printed to stderr and turns into a failing exit status.
fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
