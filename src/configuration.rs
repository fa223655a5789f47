//! src/configuration.rs
use crate::domain::SubscriberEmail;
use config::{Config, File};
use lettre::message::Mailbox;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub registry: RegistrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RegistrySettings {
    /// Location of the JSON document holding every subscriber.
    pub path: PathBuf,
}

#[derive(PartialEq)]
pub enum Environment {
    Local,
    Production,
}
impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            _ => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                s
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if not specified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base")).required(true))
        .add_source(File::from(configuration_directory.join(environment.as_str())).required(true))
        // E.g. `APP_APPLICATION__PORT=5001` sets `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Raw SMTP settings for the welcome email job, read from the process environment
/// (`SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS`, `FROM_EMAIL`, `TO_OVERRIDE`).
///
/// Nothing is checked at deserialization time so that every missing name can be
/// reported at once by [`DispatchEnvironment::validate`].
#[derive(Deserialize, Clone, Debug, Default)]
pub struct DispatchEnvironment {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<String>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<Secret<String>>,
    pub from_email: Option<String>,
    pub to_override: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Clone, Debug)]
pub struct DispatchSettings {
    pub smtp: SmtpSettings,
    pub from_email: Mailbox,
    pub to_override: Option<SubscriberEmail>,
}

#[derive(thiserror::Error, Debug)]
pub enum DispatchConfigError {
    #[error(
        "Missing SMTP configuration: {}. Please set SMTP_HOST, SMTP_PORT, SMTP_USER, SMTP_PASS, FROM_EMAIL (and optionally TO_OVERRIDE).",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),
    #[error("SMTP_PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("FROM_EMAIL is not a valid sender address, got {0:?}")]
    InvalidSender(String, #[source] lettre::address::AddressError),
    #[error("TO_OVERRIDE is not a valid email address")]
    InvalidOverride(#[source] crate::domain::EmailError),
}

impl DispatchEnvironment {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<DispatchEnvironment>()
    }

    pub fn validate(self) -> Result<DispatchSettings, DispatchConfigError> {
        let mut missing = Vec::new();

        let host = required(self.smtp_host, "SMTP_HOST", &mut missing);
        let port = required(self.smtp_port, "SMTP_PORT", &mut missing);
        let username = required(self.smtp_user, "SMTP_USER", &mut missing);
        let password = self
            .smtp_pass
            .filter(|p| !p.expose_secret().trim().is_empty());
        if password.is_none() {
            missing.push("SMTP_PASS");
        }
        let from_email = required(self.from_email, "FROM_EMAIL", &mut missing);

        let (Some(host), Some(port), Some(username), Some(password), Some(from_email)) =
            (host, port, username, password, from_email)
        else {
            return Err(DispatchConfigError::Missing(missing));
        };

        let port = port
            .parse::<u16>()
            .map_err(|_| DispatchConfigError::InvalidPort(port.clone()))?;

        let from_email = from_email
            .parse::<Mailbox>()
            .map_err(|e| DispatchConfigError::InvalidSender(from_email.clone(), e))?;

        let to_override = match self.to_override.filter(|s| !s.trim().is_empty()) {
            Some(address) => Some(
                SubscriberEmail::parse(address).map_err(DispatchConfigError::InvalidOverride)?,
            ),
            None => None,
        };

        Ok(DispatchSettings {
            smtp: SmtpSettings {
                host,
                port,
                username,
                password,
            },
            from_email,
            to_override,
        })
    }
}

fn required(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(name);
            None
        }
    }
}
