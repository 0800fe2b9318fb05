//! User-facing notifications
//!
//! Load, parse and export outcomes are published here as structured
//! messages. The presentation layer drains the unread ones after each
//! update and prints them.

use std::collections::VecDeque;

/// How many notifications the log keeps
pub const NOTIFICATION_LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn label(self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }
}

/// A titled message with a one-line description
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.level.label(),
            self.title,
            self.description
        )
    }
}

/// Bounded notification log with an unread marker
#[derive(Debug, Default)]
pub struct Notifications {
    log: VecDeque<Notification>,
    unread: usize,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        if self.log.len() == NOTIFICATION_LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(notification);
        self.unread = (self.unread + 1).min(self.log.len());
    }

    pub fn info(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Info, title, description));
    }

    pub fn warning(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Notification::new(
            NotificationLevel::Warning,
            title,
            description,
        ));
    }

    pub fn error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Error, title, description));
    }

    /// Notifications pushed since the last call, oldest first
    pub fn take_pending(&mut self) -> Vec<Notification> {
        let start = self.log.len() - self.unread;
        self.unread = 0;
        self.log.range(start..).cloned().collect()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.log.back()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
