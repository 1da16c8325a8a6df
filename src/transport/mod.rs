pub mod connection;

use std::collections::BTreeMap;
use std::fmt;

use async_channel::Receiver;
use async_trait::async_trait;

use crate::bus::SignalEvent;
use crate::error::NotifyError;
use crate::notification::Hint;

pub use self::connection::DbusTransport;

/// Positional arguments of `org.freedesktop.Notifications.Notify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyCall {
    pub app_name: String,
    pub replaces_id: u32,
    pub app_icon: String,
    pub summary: String,
    pub body: String,
    pub actions: Vec<String>,
    pub hints: BTreeMap<String, Hint>,
    pub expire_timeout: i32,
}

type Release = Box<dyn FnOnce() + Send + Sync>;

/// A live registration for notification signals, delivered through a
/// bounded queue. The queue closes when the transport shuts down.
///
/// A subscription dropped without going through
/// [`Transport::unsubscribe`] runs its release hook, so an abandoned
/// `listen` still gives its registration back.
pub struct Subscription {
    id: u64,
    receiver: Receiver<SignalEvent>,
    release: Option<Release>,
}

impl Subscription {
    pub fn new(id: u64, receiver: Receiver<SignalEvent>) -> Self {
        Subscription { id, receiver, release: None }
    }

    /// A subscription that runs `release` when dropped while still armed.
    pub fn with_release<F>(id: u64, receiver: Receiver<SignalEvent>, release: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Subscription {
            id,
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Drops the release hook. Transports call this once they have
    /// released the registration themselves.
    pub fn disarm(&mut self) {
        self.release = None;
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Waits for the next signal. `None` once the queue is closed and drained.
    pub async fn recv(&self) -> Option<SignalEvent> {
        self.receiver.recv().await.ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("armed", &self.release.is_some())
            .finish()
    }
}

/// The session bus primitives the notification handler relies on.
///
/// Implementations must allow concurrent use from several tasks and give
/// every subscription its own queue.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues `Notify` and returns the service-assigned identifier.
    async fn notify(&self, call: NotifyCall) -> Result<u32, NotifyError>;

    /// Issues `CloseNotification`.
    async fn close_notification(&self, id: u32) -> Result<(), NotifyError>;

    /// Starts receiving `ActionInvoked` and `NotificationClosed` signals.
    async fn subscribe(&self) -> Result<Subscription, NotifyError>;

    /// Removes the match rules behind `subscription` and closes its queue.
    async fn unsubscribe(&self, subscription: Subscription) -> Result<(), NotifyError>;
}
