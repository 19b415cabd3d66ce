//! Transient status line messages.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Notification,
    Warning,
    Error,
}

/// One slot per severity. Only the most severe one is visible; all are cleared at the
/// start of every key event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusMessages {
    error: Option<String>,
    warning: Option<String>,
    notification: Option<String>,
}

impl StatusMessages {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set(&mut self, severity: Severity, text: impl Into<String>) {
        let text = Some(text.into());
        match severity {
            Severity::Error => self.error = text,
            Severity::Warning => self.warning = text,
            Severity::Notification => self.notification = text,
        }
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.set(Severity::Error, text);
    }

    pub fn set_warning(&mut self, text: impl Into<String>) {
        self.set(Severity::Warning, text);
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.set(Severity::Notification, text);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    /// The message to display: error, then warning, then notification.
    pub fn visible(&self) -> Option<(Severity, &str)> {
        if let Some(e) = &self.error {
            return Some((Severity::Error, e));
        }
        if let Some(w) = &self.warning {
            return Some((Severity::Warning, w));
        }
        self.notification
            .as_deref()
            .map(|n| (Severity::Notification, n))
    }

    pub fn is_empty(&self) -> bool {
        self.visible().is_none()
    }
}
