#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_channel::Sender;
use async_trait::async_trait;
use notify_actions::{NotifyCall, NotifyError, SignalEvent, Subscription, Transport};

/// Records every call and delivers scripted signals to subscribers.
#[derive(Default)]
pub struct MockTransport {
    next_id: AtomicU32,
    next_subscription: AtomicU64,
    notify_calls: Mutex<Vec<NotifyCall>>,
    closed: Mutex<Vec<u32>>,
    subscribes: AtomicUsize,
    unsubscribes: AtomicUsize,
    queued: Mutex<Vec<SignalEvent>>,
    senders: Arc<Mutex<HashMap<u64, Sender<SignalEvent>>>>,
    released: Arc<AtomicUsize>,
    pub fail_notify: AtomicBool,
    pub fail_subscribe: AtomicBool,
    pub fail_close: AtomicBool,
    pub hang_up: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals handed to the next subscriber as soon as it subscribes.
    pub fn queue(&self, events: impl IntoIterator<Item = SignalEvent>) {
        self.queued.lock().unwrap().extend(events);
    }

    /// Delivers a signal to every live subscription.
    pub async fn emit(&self, event: SignalEvent) {
        let senders: Vec<_> = self.senders.lock().unwrap().values().cloned().collect();
        for sender in senders {
            let _ = sender.send(event.clone()).await;
        }
    }

    pub fn notify_calls(&self) -> Vec<NotifyCall> {
        self.notify_calls.lock().unwrap().clone()
    }

    pub fn closed(&self) -> Vec<u32> {
        self.closed.lock().unwrap().clone()
    }

    pub fn subscribes(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    pub fn unsubscribes(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }

    /// Subscriptions dropped without going through `unsubscribe`.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn live_subscriptions(&self) -> usize {
        self.senders.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn notify(&self, call: NotifyCall) -> Result<u32, NotifyError> {
        if self.fail_notify.load(Ordering::SeqCst) {
            return Err(NotifyError::ConnectionUnavailable(dbus::Error::new_custom(
                "org.freedesktop.DBus.Error.ServiceUnknown",
                "no notification daemon",
            )));
        }

        self.notify_calls.lock().unwrap().push(call);
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn close_notification(&self, id: u32) -> Result<(), NotifyError> {
        self.closed.lock().unwrap().push(id);

        if self.fail_close.load(Ordering::SeqCst) {
            return Err(NotifyError::Transport(dbus::Error::new_failed("already gone")));
        }
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription, NotifyError> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(NotifyError::Subscription(dbus::Error::new_failed("match rule rejected")));
        }

        self.subscribes.fetch_add(1, Ordering::SeqCst);

        let (sender, receiver) = async_channel::unbounded();
        for event in self.queued.lock().unwrap().drain(..) {
            sender.try_send(event).unwrap();
        }

        if self.hang_up.load(Ordering::SeqCst) {
            sender.close();
        }

        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        self.senders.lock().unwrap().insert(id, sender);

        let senders = Arc::clone(&self.senders);
        let released = Arc::clone(&self.released);
        Ok(Subscription::with_release(id, receiver, move || {
            if let Some(sender) = senders.lock().unwrap().remove(&id) {
                sender.close();
            }
            released.fetch_add(1, Ordering::SeqCst);
        }))
    }

    async fn unsubscribe(&self, mut subscription: Subscription) -> Result<(), NotifyError> {
        subscription.disarm();
        self.unsubscribes.fetch_add(1, Ordering::SeqCst);

        if let Some(sender) = self.senders.lock().unwrap().remove(&subscription.id()) {
            sender.close();
        }
        Ok(())
    }
}
