//! Core notification data structures.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Diagnostic;

/// Delay before success, info and warning notifications hide themselves.
pub const DEFAULT_AUTO_HIDE_DELAY: Duration = Duration::from_millis(3000);

/// Unique identifier for a notification.
///
/// Ids come from a process-wide counter, so they are never reused while the
/// process runs, regardless of which store created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n-{}", self.0)
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Whether notifications of this level hide themselves unless told
    /// otherwise. Errors stay until dismissed.
    pub fn auto_hides_by_default(&self) -> bool {
        !matches!(self, Self::Error)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message shown to the user.
///
/// `technical_details` is for developers: it is logged when the notification
/// is created and never part of the [`Display`](fmt::Display) rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub level: Level,
    pub user_message: String,
    pub technical_details: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub auto_hide: bool,
    /// Set only when `auto_hide` is true.
    pub auto_hide_delay: Option<Duration>,
}

impl Notification {
    pub(crate) fn new(
        level: Level,
        user_message: impl Into<String>,
        technical_details: Option<String>,
        auto_hide: Option<Duration>,
    ) -> Self {
        Self {
            id: NotificationId::next(),
            level,
            user_message: user_message.into(),
            technical_details,
            timestamp: Utc::now(),
            auto_hide: auto_hide.is_some(),
            auto_hide_delay: auto_hide,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.user_message)
    }
}

/// Options for showing a notification. Unset fields fall back to the
/// level's defaults.
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Written verbatim to the diagnostic log.
    pub log_message: Option<String>,
    /// Logged as a diagnostic record and stored as `technical_details`.
    pub technical_details: Option<Diagnostic>,
    pub auto_hide: Option<bool>,
    pub auto_hide_delay: Option<Duration>,
}

impl ShowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_message(mut self, message: impl Into<String>) -> Self {
        self.log_message = Some(message.into());
        self
    }

    pub fn technical_details(mut self, details: impl Into<Diagnostic>) -> Self {
        self.technical_details = Some(details.into());
        self
    }

    pub fn auto_hide(mut self, auto_hide: bool) -> Self {
        self.auto_hide = Some(auto_hide);
        self
    }

    pub fn auto_hide_delay(mut self, delay: Duration) -> Self {
        self.auto_hide_delay = Some(delay);
        self
    }

    /// Resolves the auto-hide delay for `level`, or `None` if the
    /// notification must be dismissed manually.
    pub(crate) fn resolve_auto_hide(&self, level: Level, default_delay: Duration) -> Option<Duration> {
        let auto_hide = self.auto_hide.unwrap_or_else(|| level.auto_hides_by_default());
        auto_hide.then(|| self.auto_hide_delay.unwrap_or(default_delay))
    }
}
