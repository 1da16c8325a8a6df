use std::path::PathBuf;

/// Errors surfaced by [`NotificationHandler`](crate::NotificationHandler) and
/// the notification request helpers.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The session bus, or the notification service on it, could not be reached.
    #[error("notification service unavailable: {0}")]
    ConnectionUnavailable(#[source] dbus::Error),

    /// A remote call reached the bus but did not complete.
    #[error("notification call failed: {0}")]
    Transport(#[source] dbus::Error),

    /// Registering or removing the signal match rules failed.
    #[error("failed to subscribe to notification signals: {0}")]
    Subscription(#[source] dbus::Error),

    /// Two actions of the same notification resolved to the same key.
    #[error("duplicate action key `{0}`")]
    DuplicateActionKey(String),

    /// `sound-file` hints must carry an absolute path.
    #[error("sound file path is not absolute: {0:?}")]
    InvalidSoundPath(PathBuf),
}

/// Errors that can occur while loading or saving the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither `$XDG_CONFIG_HOME` nor `$HOME` is set.
    #[error("failed to locate the user's configuration directory")]
    DirectoriesNotFound,
    #[error("failed to access config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
