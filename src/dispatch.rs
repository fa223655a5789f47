//! src/dispatch.rs
//!
//! The one-shot welcome email job: read the registry once, send one message.
use crate::configuration::{DispatchConfigError, DispatchEnvironment, DispatchSettings, SmtpSettings};
use crate::email::{EmailBuilder, MailTransport, Recipients};
use crate::routes::error_chain_fmt;
use crate::store::{RegistryStore, StoreError};

pub const WELCOME_SUBJECT: &str = "Thanks for subscribing to Wealth Wards";

pub const WELCOME_TEXT: &str = "Hi,

Thanks for joining the Wealth Wards early access list.
We are working on something special to help you protect and grow your wealth.
You will be hearing more from us soon.

In the meantime, you can reply to this email if you have any questions or ideas.

— The Wealth Wards Team";

pub const WELCOME_HTML: &str = r#"<p>Hi,</p>
<p>Thanks for joining the <strong>Wealth Wards</strong> early access list.</p>
<p>We are working on something special to help you protect and grow your wealth.<br/>
You will be hearing more from us soon.</p>
<p>In the meantime, you can reply to this email if you have any questions or ideas.</p>
<p>— <strong>The Wealth Wards Team</strong></p>"#;

#[derive(Debug, PartialEq, Eq)]
pub enum DispatchReport {
    /// The registry held no usable address; nothing was sent.
    NoSubscribers,
    Sent {
        message_id: String,
        recipients: Recipients,
    },
}

#[derive(thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Configuration(#[from] DispatchConfigError),
    #[error("Failed to open the subscriber registry")]
    Setup(#[source] anyhow::Error),
    #[error("Failed to load the subscriber registry")]
    Store(#[source] StoreError),
    #[error("Failed to send the welcome email")]
    Failed(#[source] anyhow::Error),
}

impl std::fmt::Debug for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Validates the environment, opens the store, connects the transport and dispatches.
///
/// Configuration problems are reported before the registry settings are read, the
/// registry is opened or the mail server is touched.
pub async fn run<S, T, O, C>(
    environment: DispatchEnvironment,
    open_store: O,
    connect: C,
) -> Result<DispatchReport, DispatchError>
where
    S: RegistryStore,
    T: MailTransport,
    O: FnOnce() -> Result<S, anyhow::Error>,
    C: FnOnce(&SmtpSettings) -> Result<T, anyhow::Error>,
{
    let settings = environment.validate()?;
    let store = open_store().map_err(DispatchError::Setup)?;
    let transport = connect(&settings.smtp).map_err(DispatchError::Failed)?;

    dispatch(&settings, &store, &transport).await
}

#[tracing::instrument(
    name = "Dispatching the welcome email",
    skip_all,
    fields(to_override = ?settings.to_override)
)]
pub async fn dispatch<T>(
    settings: &DispatchSettings,
    store: &dyn RegistryStore,
    transport: &T,
) -> Result<DispatchReport, DispatchError>
where
    T: MailTransport + ?Sized,
{
    let registry = store.load().map_err(DispatchError::Store)?;
    if registry.is_empty() {
        tracing::info!("No subscribers found.");
        return Ok(DispatchReport::NoSubscribers);
    }

    let emails = registry.distinct_emails();
    if emails.is_empty() {
        tracing::info!("No subscriber has a usable email address.");
        return Ok(DispatchReport::NoSubscribers);
    }

    tracing::info!("Preparing to email {} subscriber(s)...", emails.len());

    let recipients = match &settings.to_override {
        Some(address) => Recipients::Override(address.clone()),
        None => Recipients::Blind(emails),
    };

    let email = EmailBuilder::new(&settings.from_email, &recipients)
        .subject(WELCOME_SUBJECT)
        .text_content(WELCOME_TEXT)
        .html_content(WELCOME_HTML)
        .build();

    let message_id = transport
        .send_email(&email)
        .await
        .map_err(DispatchError::Failed)?;

    Ok(DispatchReport::Sent {
        message_id,
        recipients,
    })
}
