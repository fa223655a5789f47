//! src/domain/subscriber_email.rs
use serde::Serialize;
use validator::validate_email;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Empty email")]
    Empty,
    #[error("{0}")]
    Invalid(String),
}

/// A lowercased, trimmed email address. This is the identity key of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<Self, Error> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(Error::Empty);
        }

        let has_both_parts = normalized
            .rsplit_once('@')
            .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
            .unwrap_or(false);

        if has_both_parts && validate_email(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(Error::Invalid(format!("Invalid email: {}", s)))
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}
