//! Notifier trait definition and shared error types.

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A notification addressed to one account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notification {
    /// Account name of the recipient.
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait for notification channel implementations.
///
/// Delivery is best-effort from the purge's point of view: failures are
/// logged by the caller and never affect the run.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "email", "log").
    fn channel_name(&self) -> &str;
}

/// Receives progress and summary lines on behalf of the caller who started
/// the purge.
///
/// Sessions hold a `Weak` reference to their sink; when the caller goes
/// away mid-run the upgrade fails and delivery is skipped silently.
pub trait ProgressSink: Send + Sync {
    fn send(&self, line: &str);
}
