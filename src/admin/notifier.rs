use std::fmt;
use std::fmt::{Display, Formatter};
#[cfg(test)]
use std::sync::Mutex;

use spdlog::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient status message, the admin console's toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Error, message: message.into() }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sends notices to the default spdlog logger.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Info | NoticeKind::Success => info!("{}", notice),
            NoticeKind::Warning => warn!("{}", notice),
            NoticeKind::Error => error!("{}", notice),
        }
    }
}

/// Keeps every notice, in order.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(notices) => notices.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }

    pub fn has_errors(&self) -> bool {
        self.notices().iter().any(|n| n.kind == NoticeKind::Error)
    }

    pub fn clear(&self) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.clear();
        }
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::default();
        notifier.notify(Notice::info("Fetching posts from GitHub..."));
        notifier.notify(Notice::error("Error loading posts"));

        assert_eq!(notifier.notices().len(), 2);
        assert_eq!(notifier.last(), Some(Notice::error("Error loading posts")));
        assert!(notifier.has_errors());

        notifier.clear();
        assert!(notifier.notices().is_empty());
        assert!(!notifier.has_errors());
    }

    #[test]
    fn test_log_notifier_accepts_every_kind() {
        let notifier = LogNotifier;
        notifier.notify(Notice::info("info"));
        notifier.notify(Notice::success("success"));
        notifier.notify(Notice::warning("warning"));
        notifier.notify(Notice::error("error"));
    }
}
