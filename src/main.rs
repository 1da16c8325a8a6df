use std::process::ExitCode;

use notify_actions::session::SessionAction;
use notify_actions::{Action, Config, NotificationHandler};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notify_actions=info")),
        )
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "Failed to load configuration, using defaults");
            Config::default()
        }
    };

    let handler = NotificationHandler::session(config.call_timeout());

    let notification = config
        .notification()
        .summary("Session")
        .body("Your session is about to end.")
        .action(Action::new("Logout Now", || SessionAction::Logout.run()))
        .action(Action::new("Call Me", || info!("Call action triggered")));

    match notification.trigger_with_outcome(&handler).await {
        Ok((id, outcome)) => {
            info!(id, ?outcome, "Notification finished");
            ExitCode::SUCCESS
        }

        Err(err) => {
            error!(%err, "Failed to deliver notification");
            ExitCode::FAILURE
        }
    }
}
