use std::time::Duration;

use dbus::blocking::Connection;
use tracing::{info, warn};

const GNOME_SESSION_BUS: &str = "org.gnome.SessionManager";
const GNOME_SESSION_OBJECT: &str = "/org/gnome/SessionManager";

/// Session-level actions a notification button can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Lock,
    Logout,
}

impl SessionAction {
    /// The shell fallback used when the session manager cannot be asked.
    pub fn command(&self) -> &'static str {
        match self {
            SessionAction::Lock => "loginctl lock-session",
            SessionAction::Logout => "loginctl terminate-user \"$USER\"",
        }
    }

    pub fn run(&self) {
        info!(action = ?self, "Running session action");

        if *self == SessionAction::Logout {
            match logout_via_gnome() {
                Ok(()) => return,
                Err(err) => warn!(%err, "GNOME logout failed, falling back to loginctl"),
            }
        }

        match std::process::Command::new("sh").arg("-c").arg(self.command()).status() {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(action = ?self, %status, "Session command failed"),
            Err(err) => warn!(action = ?self, %err, "Failed to execute session command"),
        }
    }
}

fn logout_via_gnome() -> Result<(), dbus::Error> {
    let connection = Connection::new_session()?;
    let proxy = connection.with_proxy(GNOME_SESSION_BUS, GNOME_SESSION_OBJECT, Duration::from_secs(5));

    // mode 0: normal logout with confirmation
    proxy.method_call(GNOME_SESSION_BUS, "Logout", (0_u32,))
}
