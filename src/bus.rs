pub const NOTIFICATIONS_DBUS_BUS: &str = "org.freedesktop.Notifications";
pub const NOTIFICATIONS_DBUS_OBJECT: &str = "/org/freedesktop/Notifications";
pub const NOTIFICATIONS_DBUS_INTERFACE: &str = "org.freedesktop.Notifications";

pub const ACTION_INVOKED_SIGNAL: &str = "ActionInvoked";
pub const NOTIFICATION_CLOSED_SIGNAL: &str = "NotificationClosed";

/// Why the notification service closed a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Expired = 1,
    Dismissed = 2,
    ClosedByCall = 3,
    Undefined = 4,
}

impl From<u32> for CloseReason {
    fn from(reason: u32) -> Self {
        match reason {
            1 => CloseReason::Expired,
            2 => CloseReason::Dismissed,
            3 => CloseReason::ClosedByCall,
            _ => CloseReason::Undefined,
        }
    }
}

/// A signal emitted by the notification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalEvent {
    ActionInvoked { id: u32, action_key: String },
    NotificationClosed { id: u32, reason: CloseReason },
}

impl SignalEvent {
    /// The notification the signal refers to.
    pub fn id(&self) -> u32 {
        match self {
            SignalEvent::ActionInvoked { id, .. } => *id,
            SignalEvent::NotificationClosed { id, .. } => *id,
        }
    }
}
