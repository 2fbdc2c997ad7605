use async_trait::async_trait;
use client_core::AlertPresenter;
use shared::domain::{Alert, Severity};
use tracing::info;

/// Prints alerts as single lines on stdout.
pub struct ConsolePresenter;

#[async_trait]
impl AlertPresenter for ConsolePresenter {
    async fn present(&self, alert: &Alert) {
        info!(severity = %alert.severity, title = %alert.title, "alert shown");
        println!("{}", format_alert(alert));
    }
}

pub fn format_alert(alert: &Alert) -> String {
    let tag = match alert.severity {
        Severity::Success => "OK",
        Severity::Danger => "ERROR",
        Severity::Warning => "WARN",
    };
    format!("[{tag}] {}: {}", alert.title, alert.message)
}
