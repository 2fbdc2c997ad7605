use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Danger,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A titled message shown to the operator after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Success)
    }

    pub fn danger(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Danger)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Warning)
    }
}

/// Screen-local state: what the operator has typed or scanned so far, and
/// whether a submission is currently in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub input_buffer: String,
    pub submitting: bool,
}

impl SessionState {
    pub fn reset(&mut self) {
        self.input_buffer.clear();
        self.submitting = false;
    }
}
