//! SMTP email notifier via `lettre` with TLS support.
//!
//! Maps an account name to `<name>@<mail domain>` and delivers through an
//! SMTP relay. Credentials come from the `SMTP_USERNAME` / `SMTP_PASSWORD`
//! environment variables when both are set.

use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use sweep_core::config::SmtpConfig;

use crate::traits::{Notification, Notifier, NotifyError};

/// Sends notifications as emails via SMTP.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    mail_domain: String,
}

impl EmailNotifier {
    /// Build an `EmailNotifier` from SMTP configuration. Fails when no host
    /// is configured; callers fall back to [`LogNotifier`](crate::LogNotifier)
    /// in that case.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| NotifyError::Config("no SMTP host configured".to_string()))?;

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| NotifyError::Config(e.to_string()))?
            .port(config.port);

        // Attach credentials from environment if available.
        if let (Ok(username), Ok(password)) =
            (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD"))
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            mail_domain: config.mail_domain.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let to: Mailbox = format!("{}@{}", notification.to, self.mail_domain)
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&notification.subject)
            .body(notification.body.clone())
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        tracing::info!(
            channel = "email",
            to = %notification.to,
            subject = %notification.subject,
            "notification delivered"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_host_is_a_config_error() {
        let config = SmtpConfig {
            host: None,
            port: 587,
            from: "purge@localhost".to_string(),
            mail_domain: "localhost".to_string(),
        };
        assert!(matches!(
            EmailNotifier::from_config(&config),
            Err(NotifyError::Config(_))
        ));
    }

    #[test]
    fn bad_from_address_is_a_config_error() {
        let config = SmtpConfig {
            host: Some("smtp.example.com".to_string()),
            port: 587,
            from: "not an address".to_string(),
            mail_domain: "localhost".to_string(),
        };
        assert!(matches!(
            EmailNotifier::from_config(&config),
            Err(NotifyError::Config(_))
        ));
    }
}
