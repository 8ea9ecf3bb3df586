//! User-visible notices (alerts, toasts)

use parking_lot::Mutex;
use std::fmt;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// A user action succeeded
    Success,
    /// Informational, e.g. an empty result
    Info,
    /// A user action failed
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "Success",
            Self::Info => "Notice",
            Self::Error => "Error",
        })
    }
}

/// One acknowledgment shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Body text
    pub message: String,
}

impl Notice {
    /// Success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Presentation-layer sink for notices
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show a notice
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(text = %notice.message, "notice"),
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!(text = %notice.message, "notice"),
        }
    }
}

/// Keeps every notice for later inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice so far, oldest first
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Number of notices at `level`
    #[must_use]
    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices.lock().iter().filter(|n| n.level == level).count()
    }

    /// Most recent notice
    #[must_use]
    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_counts_by_level() {
        let recorder = RecordingNotifier::new();
        recorder.notify(Notice::success("Place added successfully!"));
        recorder.notify(Notice::error("Failed to add place. Please try again."));
        recorder.notify(Notice::error("again"));

        assert_eq!(recorder.count(NoticeLevel::Error), 2);
        assert_eq!(recorder.count(NoticeLevel::Success), 1);
        assert_eq!(recorder.last(), Some(Notice::error("again")));
    }

    #[test]
    fn tracing_notifier_accepts_every_level() {
        let notifier: std::sync::Arc<dyn Notifier> = std::sync::Arc::new(TracingNotifier);
        notifier.notify(Notice::success("Location added successfully!"));
        notifier.notify(Notice::info("No garbage places found for your current location."));
        notifier.notify(Notice::error("Failed to load location details"));
    }

    #[test]
    fn notice_display() {
        assert_eq!(Notice::info("No Data").to_string(), "Notice: No Data");
    }
}
