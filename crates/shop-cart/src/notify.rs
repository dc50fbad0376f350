//! User-visible notifications.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A message for the notification surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity of the message.
    pub severity: Severity,
    /// Message text.
    pub message: String,
    /// Blocking notices must be acknowledged; others dismiss themselves.
    pub blocking: bool,
}

impl Notice {
    /// An auto-dismissing info notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self::toast(Severity::Info, message)
    }

    /// An auto-dismissing success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self::toast(Severity::Success, message)
    }

    /// An auto-dismissing error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self::toast(Severity::Error, message)
    }

    /// A blocking alert for input or state errors.
    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            blocking: true,
        }
    }

    fn toast(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            blocking: false,
        }
    }
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    /// Show a notice.
    fn notify(&self, notice: &Notice);
}

/// Notifier that records every notice in memory.
///
/// Useful for headless sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices recorded so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    /// The most recent notice.
    pub fn last(&self) -> Option<Notice> {
        self.lock().last().cloned()
    }

    /// Forget recorded notices.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: &Notice) {
        self.lock().push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_constructors() {
        assert_eq!(Notice::info("a").severity, Severity::Info);
        assert_eq!(Notice::success("a").severity, Severity::Success);
        assert!(!Notice::error("a").blocking);

        let alert = Notice::alert("Cart is empty");
        assert!(alert.blocking);
        assert_eq!(alert.severity, Severity::Error);
    }

    #[test]
    fn test_memory_notifier_records() {
        let notifier = MemoryNotifier::new();
        notifier.notify(&Notice::info("one"));
        notifier.notify(&Notice::success("two"));

        assert_eq!(notifier.notices().len(), 2);
        assert_eq!(notifier.last().unwrap().message, "two");

        notifier.clear();
        assert!(notifier.last().is_none());
    }
}
