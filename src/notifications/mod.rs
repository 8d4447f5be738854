//! User-facing notifications.
//!
//! Two store variants implement the same [`Notify`] seam:
//!
//! - [`NotificationCenter`]: one current notification, replaced by each new
//!   one, plus an append-only history of everything shown.
//! - [`NotificationQueue`]: any number of live notifications, no history.
//!
//! A running client constructs exactly one store (see [`build`]) and passes
//! clones of the handle around. Error notifications stay until dismissed;
//! everything else hides itself after [`DEFAULT_AUTO_HIDE_DELAY`] unless
//! told otherwise. Auto-hide timers run on the tokio runtime and only ever
//! remove the notification they were scheduled for.
//!
//! Technical details (error messages, status codes, source chains) are
//! written to the `tracing` log and kept on the notification for
//! developers; rendering a notification shows only its level and user
//! message.

mod center;
mod diagnostic;
mod notification;
mod queue;
mod timer;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use center::{CenterState, NotificationCenter};
pub use diagnostic::Diagnostic;
pub use notification::{Level, Notification, NotificationId, ShowOptions, DEFAULT_AUTO_HIDE_DELAY};
pub use queue::NotificationQueue;

/// How pages report outcomes to the user.
pub trait Notify: Send + Sync {
    /// Shows a generic error message; `details` are for the log only.
    fn error(&self, user_message: &str, details: Option<Diagnostic>) -> Notification;

    fn success(&self, message: &str) -> Notification;

    /// Notifications currently on display, oldest first.
    fn live(&self) -> Vec<Notification>;

    fn dismiss(&self, id: NotificationId);
}

/// Which store variant a client runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMode {
    #[default]
    Single,
    Queue,
}

impl NotificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Queue => "queue",
        }
    }
}

impl FromStr for NotificationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "queue" => Ok(Self::Queue),
            other => Err(format!("unknown notification mode '{}', expected 'single' or 'queue'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub mode: NotificationMode,
    /// Default auto-hide delay in milliseconds.
    pub auto_hide_delay_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            mode: NotificationMode::default(),
            auto_hide_delay_ms: DEFAULT_AUTO_HIDE_DELAY.as_millis() as u64,
        }
    }
}

impl NotificationSettings {
    pub fn auto_hide_delay(&self) -> Duration {
        Duration::from_millis(self.auto_hide_delay_ms)
    }
}

/// Constructs the store selected by `settings.mode`.
pub fn build(settings: NotificationSettings) -> Arc<dyn Notify> {
    match settings.mode {
        NotificationMode::Single => Arc::new(NotificationCenter::with_settings(settings)),
        NotificationMode::Queue => Arc::new(NotificationQueue::with_settings(settings)),
    }
}
