use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::actions::ActionTable;
use crate::bus::{CloseReason, SignalEvent};
use crate::error::NotifyError;
use crate::notification::Notification;
use crate::transport::{DbusTransport, NotifyCall, Subscription, Transport};

/// The `replaces_id` sentinel asking the service for a fresh notification.
const REPLACES_NONE: u32 = 0;

/// How a [`NotificationHandler::listen`] call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// The user invoked the action with this key and its trigger ran.
    Dispatched(String),
    /// Nothing happened before the timeout elapsed.
    TimedOut,
    /// The service reported the notification closed.
    Closed(CloseReason),
    /// The transport shut down while waiting.
    ChannelClosed,
}

/// Sends notifications and waits for the user's response to them.
///
/// The handler owns its transport. Several tasks may share one handler; each
/// `listen` call gets its own subscription and only reacts to signals for the
/// notification it was given.
pub struct NotificationHandler<T = DbusTransport> {
    transport: T,
}

impl NotificationHandler<DbusTransport> {
    /// A handler on the session bus. The bus is only contacted on first use.
    pub fn session(call_timeout: Duration) -> Self {
        NotificationHandler::new(DbusTransport::session(call_timeout))
    }
}

impl<T: Transport> NotificationHandler<T> {
    pub fn new(transport: T) -> Self {
        NotificationHandler { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Shows `notification` and returns the id the service assigned to it.
    ///
    /// Does not wait for any user response; see [`listen`](Self::listen).
    pub async fn send(&self, notification: &Notification) -> Result<u32, NotifyError> {
        self.send_with_table(notification).await.map(|(id, _)| id)
    }

    pub(crate) async fn send_with_table(
        &self,
        notification: &Notification,
    ) -> Result<(u32, ActionTable), NotifyError> {
        let (table, actions) = notification.actions.derive()?;

        let call = NotifyCall {
            app_name: notification.app_name.clone(),
            replaces_id: REPLACES_NONE,
            app_icon: notification.app_icon.clone(),
            summary: notification.summary.clone(),
            body: notification.body.clone(),
            actions,
            hints: notification.hints.clone(),
            expire_timeout: notification.expire_timeout_ms(),
        };

        let id = self.transport.notify(call).await?;
        info!(id, app = %notification.app_name, actions = table.len(), "Sent notification");

        Ok((id, table))
    }

    /// Asks the service to close the notification.
    pub async fn close(&self, id: u32) -> Result<(), NotifyError> {
        self.transport.close_notification(id).await
    }

    /// Waits for the user to act on notification `id`.
    ///
    /// Returns once a registered action has been dispatched, the notification
    /// was closed, `timeout` elapsed or the transport shut down. At most one
    /// trigger from `actions` runs, on the calling task. The signal
    /// subscription is released on every one of these paths.
    ///
    /// There is no cancellation besides the timeout: to stop early, close the
    /// notification from another task or shut the transport down.
    pub async fn listen(
        &self,
        actions: &ActionTable,
        id: u32,
        timeout: Duration,
    ) -> Result<ListenOutcome, NotifyError> {
        let subscription = self.transport.subscribe().await?;
        debug!(id, subscription = subscription.id(), ?timeout, "Waiting for notification signals");

        let outcome = wait(&subscription, actions, id, timeout).await;

        if matches!(outcome, ListenOutcome::Dispatched(_) | ListenOutcome::TimedOut) {
            if let Err(err) = self.transport.close_notification(id).await {
                debug!(id, %err, "Failed to close notification");
            }
        }

        if let Err(err) = self.transport.unsubscribe(subscription).await {
            warn!(id, %err, "Failed to release notification signal subscription");
        }

        info!(id, ?outcome, "Stopped listening");
        Ok(outcome)
    }
}

async fn wait(
    subscription: &Subscription,
    actions: &ActionTable,
    id: u32,
    timeout: Duration,
) -> ListenOutcome {
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            event = subscription.recv() => match event {
                None => return ListenOutcome::ChannelClosed,

                Some(event) if event.id() != id => {
                    trace!(id, other = event.id(), "Ignoring signal for another notification");
                }

                Some(SignalEvent::ActionInvoked { action_key, .. }) => match actions.get(&action_key) {
                    Some(trigger) => {
                        debug!(id, %action_key, "Dispatching action");
                        trigger.fire();
                        return ListenOutcome::Dispatched(action_key);
                    }
                    None => debug!(id, %action_key, "Ignoring unknown action"),
                },

                Some(SignalEvent::NotificationClosed { reason, .. }) => {
                    return ListenOutcome::Closed(reason);
                }
            },

            () = &mut deadline => return ListenOutcome::TimedOut,
        }
    }
}
