//! Notification surface: one transient toast at a time.
//!
//! [`Notifier::notify`] replaces whatever toast is currently mounted, mounts
//! the new one, reveals it after two frame ticks (so a show transition can
//! run), hides it when its duration elapses and removes it 400 ms later.
//! There is no queue: the most recent message wins.
//!
//! The timers run on a spawned tokio task.  Each toast has its own
//! [`ToastId`], and a surface ignores `show`/`hide`/`remove` for ids it no
//! longer holds, so the timers of a replaced toast never touch the toast that
//! replaced it.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

/// How long a toast stays visible unless told otherwise.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(4000);

/// Delay between hiding a toast and removing it, covering the fade-out.
pub const TOAST_FADE_OUT: Duration = Duration::from_millis(400);

/// Identifies one mounted toast.
pub type ToastId = u64;

/// Visual kind of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    /// CSS modifier class (`toast success` / `toast error`).
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Font Awesome icon shown before the message.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "fa-check-circle",
            Self::Error => "fa-exclamation-circle",
        }
    }
}

/// A toast as handed to a [`ToastSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
}

/// Where toasts are displayed.
///
/// Implementations must ignore calls for ids that are no longer mounted.
#[async_trait]
pub trait ToastSurface: Send + Sync {
    /// Removes the mounted toast, if any, and mounts `toast` in its hidden
    /// state, as one step.  Returns the id of the removed toast.
    ///
    /// Callers may race; after any number of concurrent calls exactly one
    /// toast is mounted.
    fn replace(&self, toast: &Toast) -> Option<ToastId>;

    /// Makes toast `id` visible.
    fn show(&self, id: ToastId);

    /// Starts hiding toast `id`.
    fn hide(&self, id: ToastId);

    /// Removes toast `id` entirely.
    fn remove(&self, id: ToastId);

    /// Waits for the next rendering frame.
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
    }
}

/// Shows transient success and error messages.
pub struct Notifier {
    surface: Arc<dyn ToastSurface>,
    next_id: AtomicU64,
    default_duration: Duration,
    fade_out: Duration,
}

impl Notifier {
    pub fn new(surface: Arc<dyn ToastSurface>) -> Self {
        Self {
            surface,
            next_id: AtomicU64::new(1),
            default_duration: DEFAULT_TOAST_DURATION,
            fade_out: TOAST_FADE_OUT,
        }
    }

    /// Replaces the duration used by [`notify`](Self::notify).
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    /// Replaces the hide-to-remove delay.
    pub fn with_fade_out(mut self, fade_out: Duration) -> Self {
        self.fade_out = fade_out;
        self
    }

    /// Shows `message` for the default duration.
    pub fn notify(&self, message: impl Into<String>, kind: ToastKind) {
        self.notify_for(message, kind, self.default_duration);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(message, ToastKind::Error);
    }

    /// Shows `message` for `duration`, replacing the current toast.
    pub fn notify_for(&self, message: impl Into<String>, kind: ToastKind, duration: Duration) {
        let toast = Toast {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            kind,
        };
        debug!(id = toast.id, kind = kind.css_class(), message = %toast.message, "showing toast");
        if let Some(replaced) = self.surface.replace(&toast) {
            debug!(id = replaced, "toast replaced");
        }

        let id = toast.id;
        let surface = Arc::clone(&self.surface);
        let fade_out = self.fade_out;
        let lifecycle = async move {
            surface.next_frame().await;
            surface.next_frame().await;
            surface.show(id);
            tokio::time::sleep(duration).await;
            surface.hide(id);
            tokio::time::sleep(fade_out).await;
            surface.remove(id);
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(lifecycle);
            }
            Err(_) => warn!(id, "no async runtime; toast stays mounted until replaced"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::document::ToastLayer;

    fn notifier(layer: &Arc<ToastLayer>) -> Notifier {
        Notifier::new(Arc::clone(layer) as Arc<dyn ToastSurface>)
            .with_fade_out(Duration::from_millis(20))
    }

    #[test]
    fn test_kind_icons() {
        assert_eq!(ToastKind::Success.icon(), "fa-check-circle");
        assert_eq!(ToastKind::Error.icon(), "fa-exclamation-circle");
        assert_eq!(ToastKind::Error.css_class(), "error");
    }

    #[test]
    fn test_concurrent_notifications_leave_one_toast() {
        // Arrange
        const THREADS: usize = 8;
        let layer = Arc::new(ToastLayer::new());
        let notifier = Arc::new(notifier(&layer));

        for round in 0..200 {
            let barrier = Arc::new(std::sync::Barrier::new(THREADS));

            // Act
            let handles: Vec<_> = (0..THREADS)
                .map(|thread| {
                    let notifier = Arc::clone(&notifier);
                    let barrier = Arc::clone(&barrier);
                    std::thread::spawn(move || {
                        barrier.wait();
                        notifier.error(format!("round {round} thread {thread}"));
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            // Assert
            assert_eq!(layer.mounted_count(), 1, "round {round}");
        }
    }

    #[tokio::test]
    async fn test_toast_is_mounted_hidden_then_shown() {
        // Arrange
        let layer = Arc::new(ToastLayer::new());
        let notifier = notifier(&layer);

        // Act
        notifier.notify_for("Saved", ToastKind::Success, Duration::from_secs(5));
        let before = layer.visible_message();
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Assert
        assert_eq!(before, None);
        assert_eq!(layer.visible_message().as_deref(), Some("Saved"));
        assert_eq!(layer.mounted_count(), 1);
    }

    #[tokio::test]
    async fn test_second_notify_replaces_first() {
        let layer = Arc::new(ToastLayer::new());
        let notifier = notifier(&layer);

        notifier.notify_for("A", ToastKind::Success, Duration::from_secs(5));
        notifier.notify_for("B", ToastKind::Error, Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(layer.mounted_count(), 1);
        assert_eq!(layer.visible_message().as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_toast_is_removed_after_duration_and_fade() {
        let layer = Arc::new(ToastLayer::new());
        let notifier = notifier(&layer);

        notifier.notify_for("Bye", ToastKind::Success, Duration::from_millis(30));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(layer.mounted_count(), 0);
    }

    #[tokio::test]
    async fn test_replaced_toast_timers_leave_new_toast_alone() {
        // Arrange: a short-lived toast replaced by a long-lived one.
        let layer = Arc::new(ToastLayer::new());
        let notifier = notifier(&layer);

        // Act
        notifier.notify_for("short", ToastKind::Error, Duration::from_millis(10));
        notifier.notify_for("long", ToastKind::Success, Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(150)).await;

        // Assert: the first toast's hide/remove fired but hit nothing.
        assert_eq!(layer.mounted_count(), 1);
        assert_eq!(layer.visible_message().as_deref(), Some("long"));
    }
}
