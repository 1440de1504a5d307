//! Log-only and in-memory notification channels.

use std::sync::Mutex;

use crate::traits::{Notification, Notifier, NotifyError, ProgressSink};

/// Fallback channel used when no SMTP relay is configured: notifications
/// are written to the log instead of being delivered.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            channel = "log",
            to = %notification.to,
            subject = %notification.subject,
            body = %notification.body,
            "notification (mail delivery disabled)"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}

/// Records notifications for assertions in tests.
#[derive(Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose deliveries always fail.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Smtp("simulated failure".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "memory"
    }
}

/// Records progress lines for assertions in tests.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ProgressSink for MemorySink {
    fn send(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_notifier_records_sends() {
        let notifier = MemoryNotifier::new();
        let n = Notification {
            to: "merlin".to_string(),
            subject: "hello".to_string(),
            body: "world".to_string(),
        };
        notifier.send(&n).await.unwrap();
        assert_eq!(notifier.sent(), vec![n]);
    }

    #[tokio::test]
    async fn failing_notifier_errors() {
        let notifier = MemoryNotifier::failing();
        let n = Notification {
            to: "merlin".to_string(),
            subject: "hello".to_string(),
            body: "world".to_string(),
        };
        assert!(notifier.send(&n).await.is_err());
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn memory_sink_records_lines() {
        let sink = MemorySink::new();
        sink.send("one");
        sink.send("two");
        assert_eq!(sink.lines(), vec!["one", "two"]);
    }
}
