use anyhow::Context;
use waitlist::configuration::{get_configuration, DispatchEnvironment};
use waitlist::dispatch::{run, DispatchReport};
use waitlist::email::SmtpMailer;
use waitlist::store::JsonFileStore;
use waitlist::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("send_welcome_emails".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    // A local `.env` is optional; the real environment always wins.
    dotenvy::dotenv().ok();
    let environment = DispatchEnvironment::from_env()
        .context("Failed to read SMTP settings from the environment")?;

    // The registry location is only looked up once the SMTP settings are known to be usable.
    let report = run(
        environment,
        || {
            let config = get_configuration().context("Failed to read configuration.")?;
            Ok(JsonFileStore::new(config.registry.path))
        },
        |smtp| SmtpMailer::new(smtp).context("Failed to set up the SMTP transport"),
    )
    .await?;

    match report {
        DispatchReport::NoSubscribers => tracing::info!("No subscribers found, nothing was sent."),
        DispatchReport::Sent {
            message_id,
            recipients,
        } => {
            tracing::info!(
                message_id = %message_id,
                recipient_count = recipients.len(),
                "Email sent. Message ID: {}", message_id
            );
            tracing::info!("Recipients: {}", recipients);
        }
    }

    Ok(())
}
