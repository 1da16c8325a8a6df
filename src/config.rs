use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::filesystem::get_config_directory;
use crate::notification::Notification;
use crate::sound::SoundName;

const FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app_name: String,
    pub app_icon: String,
    /// How long a notification waits for the user, in seconds.
    pub timeout_secs: u64,
    /// Timeout of individual bus method calls, in milliseconds.
    pub call_timeout_ms: u64,
    pub sound: Option<SoundName>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app_name: "notify-actions".to_owned(),
            app_icon: "dialog-information".to_owned(),
            timeout_secs: 10,
            call_timeout_ms: 5000,
            sound: None,
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(get_config_directory()?.join(FILE_NAME))
    }

    /// Reads the user's configuration, writing the defaults first if no file exists.
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            let default = Config::default();
            default.save_to(path)?;
            info!(path = %path.display(), "Wrote default configuration");
            return Ok(default);
        }

        let toml = std::fs::read_to_string(path)?;
        let config = toml::from_str(&toml)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// A notification carrying this configuration's identity, timeout and sound.
    pub fn notification(&self) -> Notification {
        let mut notification = Notification::new(&self.app_name)
            .app_icon(&self.app_icon)
            .timeout(self.timeout());

        if let Some(sound) = self.sound {
            notification.set_sound_by_name(sound);
        }

        notification
    }
}
