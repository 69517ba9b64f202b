//! User-facing notifications.
//!
//! The cart reports every aborted operation here instead of returning an
//! error. Delivery is fire-and-forget.

use std::sync::{Arc, Mutex};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Warn,
    Error,
}

/// A human-readable message for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warn,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives notifications for display to the user.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);

    fn warn(&self, message: &str) {
        self.notify(Notification::warn(message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Warn => tracing::warn!("{}", notification.message),
            NotificationLevel::Error => tracing::error!("{}", notification.message),
        }
    }
}

/// Records notifications in memory.
///
/// Cloning shares the same record, so a clone can be handed to the store
/// while the original is inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Remove and return everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|mut list| std::mem::take(&mut *list))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().map_or(true, |list| list.is_empty())
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, notification: Notification) {
        // Recorded messages are still logged.
        TracingSink.notify(notification.clone());
        if let Ok(mut list) = self.inner.lock() {
            list.push(notification);
        }
    }
}
