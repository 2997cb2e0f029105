//! SMTP delivery for insight emails.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use advisor_core::config::InsightConfig;

use crate::error::InsightError;

/// Outbound mail seam. Production uses [`SmtpMailer`]; tests substitute a
/// recording implementation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), InsightError>;
}

/// lettre-based async SMTP transport, plain-text messages only.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &InsightConfig) -> Result<Self, InsightError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| InsightError::Smtp(e.to_string()))?
            .port(config.smtp_port);
        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }
        Ok(Self {
            transport: builder.build(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), InsightError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| InsightError::Message(format!("from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| InsightError::Message(format!("to address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| InsightError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| InsightError::Smtp(e.to_string()))?;
        Ok(())
    }
}
