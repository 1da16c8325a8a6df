use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::actions::{Action, Actions};
use crate::error::NotifyError;
use crate::handler::{ListenOutcome, NotificationHandler};
use crate::sound::SoundName;
use crate::transport::Transport;

pub const SOUND_NAME_HINT: &str = "sound-name";
pub const SOUND_FILE_HINT: &str = "sound-file";
pub const URGENCY_HINT: &str = "urgency";
pub const CATEGORY_HINT: &str = "category";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A variant value attached to a notification hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    Str(String),
    Byte(u8),
    Bool(bool),
    Int(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low = 0,
    Normal = 1,
    Critical = 2,
}

/// One notification request: what to show, which actions to offer and how
/// long to wait for the user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub app_name: String,
    pub app_icon: String,
    pub summary: String,
    pub body: String,
    pub hints: BTreeMap<String, Hint>,
    pub timeout: Duration,
    pub actions: Actions,
}

impl Default for Notification {
    fn default() -> Self {
        Notification {
            app_name: String::new(),
            app_icon: String::new(),
            summary: String::new(),
            body: String::new(),
            hints: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
            actions: Actions::new(),
        }
    }
}

impl Notification {
    pub fn new(app_name: &str) -> Self {
        Notification {
            app_name: app_name.to_owned(),
            ..Self::default()
        }
    }

    pub fn app_icon(mut self, app_icon: &str) -> Self {
        self.app_icon = app_icon.to_owned();
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_owned();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_owned();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn hint(mut self, key: &str, value: Hint) -> Self {
        self.hints.insert(key.to_owned(), value);
        self
    }

    pub fn set_sound_by_name(&mut self, name: SoundName) {
        self.hints.insert(SOUND_NAME_HINT.to_owned(), Hint::Str(name.to_string()));
        debug!(sound = %name, "Set sound-name hint");
    }

    /// Plays the given file instead of a theme sound. The path must be absolute.
    pub fn set_sound_by_path(&mut self, path: impl AsRef<Path>) -> Result<(), NotifyError> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(NotifyError::InvalidSoundPath(path.to_path_buf()));
        }

        self.hints.insert(
            SOUND_FILE_HINT.to_owned(),
            Hint::Str(path.to_string_lossy().into_owned()),
        );
        Ok(())
    }

    pub fn set_urgency(&mut self, urgency: Urgency) {
        self.hints.insert(URGENCY_HINT.to_owned(), Hint::Byte(urgency as u8));
    }

    pub fn set_category(&mut self, category: &str) {
        self.hints.insert(CATEGORY_HINT.to_owned(), Hint::Str(category.to_owned()));
    }

    /// The `expire_timeout` argument of `Notify`, in milliseconds.
    pub fn expire_timeout_ms(&self) -> i32 {
        i32::try_from(self.timeout.as_millis()).unwrap_or(i32::MAX)
    }

    /// Sends the notification and waits until an action fires, the
    /// notification is closed or its timeout elapses.
    pub async fn trigger<T: Transport>(&self, handler: &NotificationHandler<T>) -> Result<u32, NotifyError> {
        self.trigger_with_outcome(handler).await.map(|(id, _)| id)
    }

    /// Like [`trigger`](Self::trigger), also reporting how the wait ended.
    pub async fn trigger_with_outcome<T: Transport>(
        &self,
        handler: &NotificationHandler<T>,
    ) -> Result<(u32, ListenOutcome), NotifyError> {
        let (id, table) = handler.send_with_table(self).await?;
        let outcome = handler.listen(&table, id, self.timeout).await?;
        Ok((id, outcome))
    }
}
