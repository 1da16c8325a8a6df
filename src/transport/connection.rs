use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use async_channel::Sender;
use async_trait::async_trait;
use dbus::arg::{PropMap, RefArg, Variant};
use dbus::message::MatchRule;
use dbus::nonblock::{MsgMatch, Proxy, SyncConnection};
use dbus_tokio::connection;
use tokio::runtime::Handle;
use tokio::sync::OnceCell;
use tracing::{debug, error, warn};

use crate::bus::{
    self, CloseReason, SignalEvent, ACTION_INVOKED_SIGNAL, NOTIFICATION_CLOSED_SIGNAL,
};
use crate::error::NotifyError;
use crate::notification::Hint;
use super::{NotifyCall, Subscription, Transport};

/// Slots per subscription queue. Signals arriving while the queue is full
/// are dropped.
pub const SIGNAL_QUEUE_CAPACITY: usize = 10;

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

const DISCONNECTED_ERROR: &str = "org.freedesktop.DBus.Error.Disconnected";

const SERVICE_MISSING_ERRORS: &[&str] = &[
    "org.freedesktop.DBus.Error.ServiceUnknown",
    "org.freedesktop.DBus.Error.NameHasNoOwner",
];

struct Registration {
    sender: Sender<SignalEvent>,
    matches: Vec<MsgMatch>,
}

type Registry = Arc<Mutex<HashMap<u64, Registration>>>;

/// [`Transport`] over a shared, lazily opened session bus connection.
///
/// Construction never touches the bus. The connection is opened by the first
/// call and a failure to open it is reported as
/// [`NotifyError::ConnectionUnavailable`] from that call. Must be used from
/// within a tokio runtime.
///
/// There is no reconnect: once the connection drops, every later call fails
/// with [`NotifyError::ConnectionUnavailable`]. Create a new transport to
/// connect again.
pub struct DbusTransport {
    connection: OnceCell<Arc<SyncConnection>>,
    lost: Arc<AtomicBool>,
    call_timeout: Duration,
    registry: Registry,
    next_subscription: AtomicU64,
}

impl Default for DbusTransport {
    fn default() -> Self {
        DbusTransport::session(DEFAULT_CALL_TIMEOUT)
    }
}

impl DbusTransport {
    pub fn session(call_timeout: Duration) -> Self {
        DbusTransport {
            connection: OnceCell::new(),
            lost: Arc::new(AtomicBool::new(false)),
            call_timeout,
            registry: Arc::new(Mutex::new(HashMap::new())),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Closes every subscription queue. Listeners waiting on them terminate
    /// with [`ListenOutcome::ChannelClosed`](crate::ListenOutcome::ChannelClosed).
    pub fn shutdown(&self) {
        close_all(&self.registry);
    }

    async fn connection(&self) -> Result<Arc<SyncConnection>, NotifyError> {
        if self.lost.load(Ordering::Acquire) {
            return Err(NotifyError::ConnectionUnavailable(dbus::Error::new_custom(
                DISCONNECTED_ERROR,
                "lost connection to the session bus",
            )));
        }

        self.connection
            .get_or_try_init(|| async {
                let (resource, connection) = connection::new_session_sync()
                    .map_err(NotifyError::ConnectionUnavailable)?;

                // every subscription has its own match rules and must see each signal
                connection.set_signal_match_mode(true);

                let registry = Arc::clone(&self.registry);
                let lost = Arc::clone(&self.lost);
                tokio::spawn(async move {
                    let err = resource.await;
                    error!(%err, "Lost connection to the session bus");
                    lost.store(true, Ordering::Release);
                    close_all(&registry);
                });

                debug!("Connected to the session bus");
                Ok::<_, NotifyError>(connection)
            })
            .await
            .map(Arc::clone)
    }

    fn proxy(&self, connection: Arc<SyncConnection>) -> Proxy<'static, Arc<SyncConnection>> {
        Proxy::new(
            bus::NOTIFICATIONS_DBUS_BUS,
            bus::NOTIFICATIONS_DBUS_OBJECT,
            self.call_timeout,
            connection,
        )
    }
}

#[async_trait]
impl Transport for DbusTransport {
    async fn notify(&self, call: NotifyCall) -> Result<u32, NotifyError> {
        let connection = self.connection().await?;

        let reply = {
            let proxy = self.proxy(connection);
            let NotifyCall {
                app_name,
                replaces_id,
                app_icon,
                summary,
                body,
                actions,
                hints,
                expire_timeout,
            } = call;

            proxy.method_call::<(u32,), _, _, _>(
                bus::NOTIFICATIONS_DBUS_INTERFACE,
                "Notify",
                (app_name, replaces_id, app_icon, summary, body, actions, hints_to_prop_map(&hints), expire_timeout),
            )
        };

        let (id,) = reply.await.map_err(call_error)?;
        Ok(id)
    }

    async fn close_notification(&self, id: u32) -> Result<(), NotifyError> {
        let connection = self.connection().await?;
        let reply = self.proxy(connection).method_call::<(), _, _, _>(
            bus::NOTIFICATIONS_DBUS_INTERFACE,
            "CloseNotification",
            (id,),
        );

        reply.await.map_err(call_error)
    }

    async fn subscribe(&self) -> Result<Subscription, NotifyError> {
        let connection = self.connection().await?;
        let (sender, receiver) = async_channel::bounded(SIGNAL_QUEUE_CAPACITY);

        let invoked = connection
            .add_match(MatchRule::new_signal(bus::NOTIFICATIONS_DBUS_INTERFACE, ACTION_INVOKED_SIGNAL))
            .await
            .map_err(NotifyError::Subscription)?
            .cb({
                let sender = sender.clone();
                move |_, (id, action_key): (u32, String)| {
                    forward(&sender, SignalEvent::ActionInvoked { id, action_key });
                    true
                }
            });

        let closed = match connection
            .add_match(MatchRule::new_signal(bus::NOTIFICATIONS_DBUS_INTERFACE, NOTIFICATION_CLOSED_SIGNAL))
            .await
        {
            Ok(msg_match) => msg_match.cb({
                let sender = sender.clone();
                move |_, (id, reason): (u32, u32)| {
                    forward(&sender, SignalEvent::NotificationClosed { id, reason: CloseReason::from(reason) });
                    true
                }
            }),

            Err(err) => {
                if let Err(remove_err) = connection.remove_match(invoked.token()).await {
                    warn!(%remove_err, "Failed to roll back ActionInvoked match rule");
                }
                return Err(NotifyError::Subscription(err));
            }
        };

        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Registration {
                sender,
                matches: vec![invoked, closed],
            });

        debug!(subscription = id, "Subscribed to notification signals");

        let registry = Arc::downgrade(&self.registry);
        let connection = Arc::downgrade(&connection);
        Ok(Subscription::with_release(id, receiver, move || {
            release_dropped(&registry, &connection, id);
        }))
    }

    async fn unsubscribe(&self, mut subscription: Subscription) -> Result<(), NotifyError> {
        subscription.disarm();

        let registration = self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&subscription.id());

        let Some(registration) = registration else {
            return Ok(());
        };

        registration.sender.close();

        let connection = self.connection().await?;
        let mut result = Ok(());
        for msg_match in registration.matches {
            if let Err(err) = connection.remove_match(msg_match.token()).await {
                if result.is_ok() {
                    result = Err(NotifyError::Subscription(err));
                }
            }
        }

        debug!(subscription = subscription.id(), "Unsubscribed from notification signals");
        result
    }
}

fn forward(sender: &Sender<SignalEvent>, event: SignalEvent) {
    if let Err(err) = sender.try_send(event) {
        if err.is_full() {
            warn!(event = ?err.into_inner(), "Signal queue full, dropping signal");
        }
    }
}

/// Releases a subscription that was dropped before `unsubscribe` ran.
fn release_dropped(
    registry: &Weak<Mutex<HashMap<u64, Registration>>>,
    connection: &Weak<SyncConnection>,
    id: u64,
) {
    let Some(registry) = registry.upgrade() else {
        return;
    };

    let registration = registry
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&id);

    let Some(registration) = registration else {
        return;
    };

    registration.sender.close();

    let (Some(connection), Ok(runtime)) = (connection.upgrade(), Handle::try_current()) else {
        warn!(subscription = id, "Subscription dropped outside a runtime, match rules stay registered");
        return;
    };

    runtime.spawn(async move {
        for msg_match in registration.matches {
            if let Err(err) = connection.remove_match(msg_match.token()).await {
                warn!(subscription = id, %err, "Failed to remove match rule of dropped subscription");
            }
        }
        debug!(subscription = id, "Released dropped subscription");
    });
}

fn close_all(registry: &Registry) {
    let registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
    for registration in registry.values() {
        registration.sender.close();
    }
}

fn call_error(err: dbus::Error) -> NotifyError {
    match err.name() {
        Some(name) if SERVICE_MISSING_ERRORS.contains(&name) => NotifyError::ConnectionUnavailable(err),
        _ => NotifyError::Transport(err),
    }
}

fn hints_to_prop_map(hints: &BTreeMap<String, Hint>) -> PropMap {
    hints
        .iter()
        .map(|(key, hint)| {
            let value: Box<dyn RefArg> = match hint {
                Hint::Str(value) => Box::new(value.clone()),
                Hint::Byte(value) => Box::new(*value),
                Hint::Bool(value) => Box::new(*value),
                Hint::Int(value) => Box::new(*value),
            };
            (key.clone(), Variant(value))
        })
        .collect()
}
