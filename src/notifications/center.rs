//! Single-slot notification store with history.
//!
//! At most one notification is current; showing a new one replaces it. Every
//! notification ever shown is kept, in order, in an append-only history.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;

use super::diagnostic::record_error;
use super::timer::{self, AutoHide};
use super::{Diagnostic, Level, Notification, NotificationId, NotificationSettings, Notify, ShowOptions};

/// Observable state of a [`NotificationCenter`].
#[derive(Debug, Clone, Default)]
pub struct CenterState {
    pub current: Option<Notification>,
    pub history: Vec<Notification>,
}

struct Inner {
    state: watch::Sender<CenterState>,
    /// Auto-hide timer of the current notification, if it has one.
    pending: Mutex<Option<AutoHide>>,
    settings: NotificationSettings,
}

/// Shared handle to the single-slot notification store.
///
/// Cloning is cheap and every clone talks to the same store. Construct one
/// per running client and hand clones to whatever needs to show or render
/// notifications.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_settings(NotificationSettings::default())
    }

    pub fn with_settings(settings: NotificationSettings) -> Self {
        let (state, _) = watch::channel(CenterState::default());
        Self {
            inner: Arc::new(Inner {
                state,
                pending: Mutex::new(None),
                settings,
            }),
        }
    }

    /// Shows an error. Errors never auto-hide.
    ///
    /// `technical_details` goes to the diagnostic log and onto the
    /// notification, never into `user_message`.
    pub fn show_error(
        &self,
        user_message: impl Into<String>,
        technical_details: Option<Diagnostic>,
    ) -> Notification {
        let user_message = user_message.into();
        let details = record_error(&user_message, technical_details.as_ref());
        let notification = Notification::new(Level::Error, user_message, details, None);

        let mut pending = self.inner.lock_pending();
        cancel(pending.take());
        self.inner.push(notification.clone());

        notification
    }

    /// Shows a success message, hidden after 3 seconds unless `options` say
    /// otherwise.
    pub fn show_success(&self, message: impl Into<String>, options: ShowOptions) -> Notification {
        let message = message.into();
        tracing::info!("Success: {}", message);
        if let Some(log_message) = &options.log_message {
            tracing::info!("{}", log_message);
        }

        let auto_hide = options.resolve_auto_hide(Level::Success, self.inner.settings.auto_hide_delay());
        let notification = Notification::new(Level::Success, message, None, auto_hide);

        let mut pending = self.inner.lock_pending();
        cancel(pending.take());
        self.inner.push(notification.clone());
        if let Some(delay) = auto_hide {
            let inner = Arc::downgrade(&self.inner);
            let id = notification.id;
            *pending = timer::schedule(id, delay, move || expire(&inner, id));
        }

        notification
    }

    /// Removes the current notification, whatever it is.
    pub fn clear_error(&self) {
        let mut pending = self.inner.lock_pending();
        cancel(pending.take());
        self.inner.state.send_if_modified(|state| state.current.take().is_some());
    }

    /// Removes the current notification if it has `id`, or unconditionally
    /// when `id` is `None`. Unknown ids are ignored.
    pub fn clear(&self, id: Option<NotificationId>) {
        match id {
            None => self.clear_error(),
            Some(id) if self.is_current(id) => {
                let mut pending = self.inner.lock_pending();
                if pending.as_ref().is_some_and(|t| t.id() == id) {
                    cancel(pending.take());
                }
                self.inner.state.send_if_modified(|state| take_if_current(state, id));
            }
            Some(_) => {}
        }
    }

    pub fn current(&self) -> Option<Notification> {
        self.inner.state.borrow().current.clone()
    }

    pub fn history(&self) -> Vec<Notification> {
        self.inner.state.borrow().history.clone()
    }

    pub fn snapshot(&self) -> CenterState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified whenever the current notification or the
    /// history changes.
    pub fn subscribe(&self) -> watch::Receiver<CenterState> {
        self.inner.state.subscribe()
    }

    fn is_current(&self, id: NotificationId) -> bool {
        self.inner
            .state
            .borrow()
            .current
            .as_ref()
            .is_some_and(|n| n.id == id)
    }
}

impl Inner {
    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<AutoHide>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, notification: Notification) {
        self.state.send_modify(|state| {
            state.history.push(notification.clone());
            state.current = Some(notification);
        });
    }
}

fn cancel(timer: Option<AutoHide>) {
    if let Some(timer) = timer {
        timer.cancel();
    }
}

fn take_if_current(state: &mut CenterState, id: NotificationId) -> bool {
    if state.current.as_ref().is_some_and(|n| n.id == id) {
        state.current = None;
        true
    } else {
        false
    }
}

/// Timer callback. Only clears the notification it was scheduled for.
fn expire(inner: &Weak<Inner>, id: NotificationId) {
    let Some(inner) = inner.upgrade() else {
        return;
    };

    let mut pending = inner.lock_pending();
    if pending.as_ref().is_some_and(|t| t.id() == id) {
        // Drop without aborting: this is the timer's own task.
        pending.take();
    }
    if inner.state.send_if_modified(|state| take_if_current(state, id)) {
        tracing::debug!(%id, "Notification auto-hidden");
    }
}

impl Notify for NotificationCenter {
    fn error(&self, user_message: &str, details: Option<Diagnostic>) -> Notification {
        self.show_error(user_message, details)
    }

    fn success(&self, message: &str) -> Notification {
        self.show_success(message, ShowOptions::default())
    }

    fn live(&self) -> Vec<Notification> {
        self.current().into_iter().collect()
    }

    fn dismiss(&self, id: NotificationId) {
        self.clear(Some(id));
    }
}
