//! One-shot auto-hide timers.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::NotificationId;

/// Cancellation handle for a scheduled auto-hide.
#[derive(Debug)]
pub(crate) struct AutoHide {
    id: NotificationId,
    task: JoinHandle<()>,
}

impl AutoHide {
    pub(crate) fn id(&self) -> NotificationId {
        self.id
    }

    pub(crate) fn cancel(self) {
        self.task.abort();
    }
}

/// Runs `on_expire` once `delay` has elapsed.
///
/// The deadline is fixed now, not when the task is first polled. Returns
/// `None` outside a tokio runtime or when the deadline is past the end of
/// the clock; the notification then stays until it is cleared.
pub(crate) fn schedule<F>(id: NotificationId, delay: Duration, on_expire: F) -> Option<AutoHide>
where
    F: FnOnce() + Send + 'static,
{
    let Ok(runtime) = Handle::try_current() else {
        tracing::warn!(%id, "No async runtime; notification will not auto-hide");
        return None;
    };

    let Some(deadline) = Instant::now().checked_add(delay) else {
        tracing::debug!(%id, ?delay, "Auto-hide delay out of range; notification will not auto-hide");
        return None;
    };
    let task = runtime.spawn(async move {
        tokio::time::sleep_until(deadline).await;
        on_expire();
    });

    Some(AutoHide { id, task })
}
