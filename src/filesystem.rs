use std::path::PathBuf;

use crate::error::ConfigError;

pub const APP_DIRECTORY: &str = "notify-actions";

pub fn get_home_directory() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// `$XDG_CONFIG_HOME/notify-actions`, falling back to `~/.config/notify-actions`.
pub fn get_config_directory() -> Result<PathBuf, ConfigError> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| get_home_directory().map(|home| home.join(".config")))
        .ok_or(ConfigError::DirectoriesNotFound)?;

    Ok(base.join(APP_DIRECTORY))
}
