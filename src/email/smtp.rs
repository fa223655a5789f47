//! src/email/smtp.rs
use crate::configuration::SmtpSettings;
use crate::email::{Email, MailTransport, Recipients};
use crate::telemetry::spawn_blocking_with_tracing;
use anyhow::Context;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;
use std::time::Duration;
use uuid::Uuid;

/// Port on which SMTP servers expect TLS from the first byte. Everything else
/// upgrades with STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, lettre::transport::smtp::Error> {
        let credentials = Credentials::new(
            settings.username.clone(),
            settings.password.expose_secret().clone(),
        );

        let builder = if settings.port == IMPLICIT_TLS_PORT {
            SmtpTransport::relay(&settings.host)?
        } else {
            SmtpTransport::starttls_relay(&settings.host)?
        };

        let transport = builder
            .port(settings.port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(30)))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait::async_trait]
impl MailTransport for SmtpMailer {
    #[tracing::instrument(
        name = "Sending an email over SMTP",
        skip(self, email),
        fields(recipient_count = email.recipients.len())
    )]
    async fn send_email(&self, email: &Email<'_>) -> Result<String, anyhow::Error> {
        let (message_id, message) = build_message(email)?;

        let transport = self.transport.clone();
        spawn_blocking_with_tracing(move || transport.send(&message))
            .await
            .context("Failed to spawn the SMTP delivery task")?
            .context("The SMTP server did not accept the message")?;

        Ok(message_id)
    }
}

/// Turns an [`Email`] into a MIME message with plain-text and HTML alternatives.
///
/// Blind recipients only appear in the envelope, never in a visible header.
fn build_message(email: &Email<'_>) -> Result<(String, Message), anyhow::Error> {
    let message_id = format!("<{}@{}>", Uuid::new_v4(), email.sender.email.domain());

    let mut builder = Message::builder()
        .from(email.sender.clone())
        .subject(email.subject)
        .message_id(Some(message_id.clone()));

    match email.recipients {
        Recipients::Override(address) => {
            builder = builder.to(parse_mailbox(address.as_ref())?);
        }
        Recipients::Blind(addresses) => {
            for address in addresses {
                builder = builder.bcc(parse_mailbox(address.as_ref())?);
            }
        }
    }

    let message = builder
        .multipart(MultiPart::alternative_plain_html(
            email.text_content.to_owned(),
            email.html_content.to_owned(),
        ))
        .context("Failed to build the email message")?;

    Ok((message_id, message))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, anyhow::Error> {
    address
        .parse()
        .with_context(|| format!("Invalid recipient address {:?}", address))
}
