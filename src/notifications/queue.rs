//! Multi-live notification queue.
//!
//! Any number of notifications can be live at once, in creation order. Each
//! one leaves on its own: by its timer or by an explicit clear. No history
//! is kept.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;

use super::diagnostic::record_error;
use super::timer::{self, AutoHide};
use super::{Diagnostic, Level, Notification, NotificationId, NotificationSettings, Notify, ShowOptions};

struct Inner {
    live: watch::Sender<Vec<Notification>>,
    timers: Mutex<HashMap<NotificationId, AutoHide>>,
    settings: NotificationSettings,
}

/// Shared handle to the queue store. Clones share state.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<Inner>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::with_settings(NotificationSettings::default())
    }

    pub fn with_settings(settings: NotificationSettings) -> Self {
        let (live, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                live,
                timers: Mutex::new(HashMap::new()),
                settings,
            }),
        }
    }

    /// Appends a notification to the live queue and returns it; keep its id
    /// to dismiss it manually.
    pub fn show(&self, level: Level, user_message: impl Into<String>, options: ShowOptions) -> Notification {
        let user_message = user_message.into();

        if let Some(log_message) = &options.log_message {
            match level {
                Level::Error => tracing::error!("{}", log_message),
                Level::Warning => tracing::warn!("{}", log_message),
                Level::Info | Level::Success => tracing::info!("{}", log_message),
            }
        }
        let details = match &options.technical_details {
            Some(details) => record_error(&user_message, Some(details)),
            None => None,
        };

        let auto_hide = options.resolve_auto_hide(level, self.inner.settings.auto_hide_delay());
        let notification = Notification::new(level, user_message, details, auto_hide);
        let id = notification.id;

        let mut timers = self.inner.lock_timers();
        self.inner.live.send_modify(|live| live.push(notification.clone()));
        if let Some(delay) = auto_hide {
            let inner = Arc::downgrade(&self.inner);
            if let Some(timer) = timer::schedule(id, delay, move || expire(&inner, id)) {
                timers.insert(id, timer);
            }
        }

        notification
    }

    /// Removes the notification with `id`, or every live notification when
    /// `id` is `None`. Unknown ids are ignored.
    pub fn clear(&self, id: Option<NotificationId>) {
        let mut timers = self.inner.lock_timers();
        match id {
            None => {
                for (_, timer) in timers.drain() {
                    timer.cancel();
                }
                self.inner.live.send_if_modified(|live| {
                    let had_any = !live.is_empty();
                    live.clear();
                    had_any
                });
            }
            Some(id) => {
                if let Some(timer) = timers.remove(&id) {
                    timer.cancel();
                }
                self.inner.live.send_if_modified(|live| remove(live, id));
            }
        }
    }

    pub fn live(&self) -> Vec<Notification> {
        self.inner.live.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.live.subscribe()
    }
}

impl Inner {
    fn lock_timers(&self) -> MutexGuard<'_, HashMap<NotificationId, AutoHide>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn remove(live: &mut Vec<Notification>, id: NotificationId) -> bool {
    match live.iter().position(|n| n.id == id) {
        Some(index) => {
            live.remove(index);
            true
        }
        None => false,
    }
}

fn expire(inner: &Weak<Inner>, id: NotificationId) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    let mut timers = inner.lock_timers();
    // Own task; dropping the handle detaches it.
    timers.remove(&id);
    if inner.live.send_if_modified(|live| remove(live, id)) {
        tracing::debug!(%id, "Notification auto-hidden");
    }
}

impl Notify for NotificationQueue {
    fn error(&self, user_message: &str, details: Option<Diagnostic>) -> Notification {
        let mut options = ShowOptions::new();
        match details {
            Some(details) => options.technical_details = Some(details),
            None => {
                tracing::error!(user_message, "Error occurred");
            }
        }
        self.show(Level::Error, user_message, options)
    }

    fn success(&self, message: &str) -> Notification {
        tracing::info!("Success: {}", message);
        self.show(Level::Success, message, ShowOptions::default())
    }

    fn live(&self) -> Vec<Notification> {
        NotificationQueue::live(self)
    }

    fn dismiss(&self, id: NotificationId) {
        self.clear(Some(id));
    }
}
