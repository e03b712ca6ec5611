use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::SmtpConfig;
use crate::notification::email::{compose_email, ComposedEmail, EmailTone};
use crate::notification::{Notification, Notifier};

#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Sends outcome emails over a STARTTLS relay.
pub struct SmtpNotifier {
    config: SmtpConfig,
}

impl SmtpNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        if config.credentials().is_none() {
            warn!("EMAIL_SENDER / EMAIL_PASSWORD not set; candidate emails will not be sent");
        }
        Self { config }
    }

    async fn send(
        &self,
        sender: &str,
        password: &str,
        to: &str,
        email: &ComposedEmail,
    ) -> Result<(), SendError> {
        let message = build_message(sender, to, email)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)?
            .port(self.config.port)
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .timeout(Some(self.config.timeout))
            .build();

        transport.send(message).await?;
        Ok(())
    }
}

fn build_message(sender: &str, to: &str, email: &ComposedEmail) -> Result<Message, SendError> {
    let from: Mailbox = sender.parse()?;
    let to: Mailbox = to.parse()?;
    Ok(Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())?)
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, notification: &Notification) -> bool {
        let Some((sender, password)) = self.config.credentials() else {
            error!("Email sender credentials (EMAIL_SENDER, EMAIL_PASSWORD) not configured. Cannot send email.");
            return false;
        };

        let Some(to) = notification
            .address
            .as_deref()
            .filter(|a| !a.trim().is_empty())
        else {
            warn!(
                "No email address found for candidate {}. Skipping email.",
                notification.candidate_name.as_deref().unwrap_or("unknown")
            );
            return false;
        };

        let email = compose_email(notification, &self.config.company_name);
        let kind = match email.tone {
            EmailTone::Congratulatory => "congratulatory",
            EmailTone::Rejection => "rejection",
        };
        info!(
            "Sending {kind} email to {to} for {}",
            notification.job_title
        );

        match self.send(sender, password, to, &email).await {
            Ok(()) => {
                info!("Email successfully sent to {to}");
                true
            }
            Err(e) => {
                error!("Failed to send email to {to}: {e}");
                false
            }
        }
    }
}
