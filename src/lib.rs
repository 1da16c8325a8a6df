//! Desktop notifications with clickable actions over the freedesktop
//! notification service.
//!
//! ```no_run
//! # async fn demo() -> Result<(), notify_actions::NotifyError> {
//! use std::time::Duration;
//! use notify_actions::{Action, Notification, NotificationHandler};
//!
//! let handler = NotificationHandler::session(Duration::from_secs(5));
//! let id = Notification::new("backup")
//!     .summary("Backup finished")
//!     .action(Action::new("Open folder", || println!("opening")))
//!     .timeout(Duration::from_secs(30))
//!     .trigger(&handler)
//!     .await?;
//! # let _ = id;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod bus;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod handler;
pub mod notification;
pub mod session;
pub mod sound;
pub mod transport;

pub use actions::{Action, ActionTable, Actions, Trigger};
pub use bus::{CloseReason, SignalEvent};
pub use config::Config;
pub use error::{ConfigError, NotifyError};
pub use handler::{ListenOutcome, NotificationHandler};
pub use notification::{Hint, Notification, Urgency};
pub use sound::SoundName;
pub use transport::{DbusTransport, NotifyCall, Subscription, Transport};
