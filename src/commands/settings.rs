//! Config command - read and change settings

use crate::cli::{ConfigCommands, split_setting};
use crate::config::MfbatchConfig;
use crate::{MfbatchError, Result};

/// Execute a config subcommand, saving changes to `~/.config/mfbatch/config.toml`
///
/// # Errors
/// Returns an error for a malformed setting, an unknown key or a failed save.
pub fn execute(config: &mut MfbatchConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = split_setting(setting).ok_or_else(|| {
                MfbatchError::InvalidInput("Invalid format. Use: mfbatch config set key=value".into())
            })?;
            config.set(key, value)?;
            config.save()?;
            if !quiet {
                println!("Set {key} = {}", config.get(key)?);
            }
        }
        ConfigCommands::Get { key } => {
            println!("{}", config.get(key)?);
        }
        ConfigCommands::Path => {
            println!("{}", MfbatchConfig::config_path()?.display());
        }
    }
    Ok(())
}
