//! src/email/mod.rs
mod message;
pub use message::{Email, EmailBuilder, Recipients};

mod smtp;
pub use smtp::SmtpMailer;

/// Anything that can hand one message to a mail system.
///
/// A successful call means the whole message was accepted; it returns the message id
/// stamped on it.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_email(&self, email: &Email<'_>) -> Result<String, anyhow::Error>;
}
