//! Outbound mail for the contact form.

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use scribe_types::api::ContactForm;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail relay is not configured")]
    NotConfigured,

    #[error("invalid mailbox: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// A contact-form submission on its way to the site owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl From<ContactForm> for ContactMessage {
    fn from(form: ContactForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            phone: form.phone,
            message: form.message,
        }
    }
}

impl ContactMessage {
    pub fn subject(site_name: &str) -> String {
        format!("New Message from {}", site_name)
    }

    pub fn body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nPhone: {}\nMessage: {}",
            self.name, self.email, self.phone, self.message
        )
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// Relays through an authenticated, TLS-wrapped SMTP session. Mail goes from
/// and to the relay account itself.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    site_address: Mailbox,
    site_name: String,
}

impl SmtpMailer {
    pub fn new(host: &str, user: &str, password: &str, site_name: &str) -> Result<Self, MailError> {
        let site_address: Mailbox = user.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        Ok(Self {
            transport,
            site_address,
            site_name: site_name.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), MailError> {
        let email = Message::builder()
            .from(self.site_address.clone())
            .to(self.site_address.clone())
            .subject(ContactMessage::subject(&self.site_name))
            .header(ContentType::TEXT_PLAIN)
            .body(message.body())?;

        self.transport.send(email).await?;
        info!("Relayed contact message from {}", message.email);
        Ok(())
    }
}

/// Used when no relay credentials are configured: every send fails.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _message: &ContactMessage) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContactMessage {
        ContactMessage {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "555-0100".into(),
            message: "Loved the post!".into(),
        }
    }

    #[test]
    fn body_lists_every_field() {
        assert_eq!(
            sample().body(),
            "Name: Ana\nEmail: ana@example.com\nPhone: 555-0100\nMessage: Loved the post!"
        );
        assert_eq!(ContactMessage::subject("themarcoblog.com"), "New Message from themarcoblog.com");
    }

    #[test]
    fn relay_account_must_be_a_mailbox() {
        assert!(matches!(
            SmtpMailer::new("smtp.example.com", "not-an-address", "pw", "blog"),
            Err(MailError::Address(_))
        ));
    }

    #[tokio::test]
    async fn disabled_mailer_always_fails() {
        let result = DisabledMailer.send(&sample()).await;
        assert!(matches!(result, Err(MailError::NotConfigured)));
    }
}
