//! src/domain/subscriber.rs
use crate::domain::SubscriberEmail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A validated subscription request, before it is stamped and stored.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    /// Best-effort client address. Audit only.
    pub ip: String,
}

/// One record of the persisted registry.
///
/// `email` is kept as a plain string because records are read back from disk; readers
/// that need a trusted address re-parse it through [`SubscriberEmail::parse`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Subscriber {
    pub email: String,
    #[serde(rename = "subscribedAt")]
    pub subscribed_at: DateTime<Utc>,
    #[serde(default = "unknown_ip")]
    pub ip: String,
}

impl Subscriber {
    pub fn new(new_subscriber: NewSubscriber, subscribed_at: DateTime<Utc>) -> Self {
        Self {
            email: new_subscriber.email.as_ref().to_owned(),
            subscribed_at,
            ip: new_subscriber.ip,
        }
    }
}

fn unknown_ip() -> String {
    "unknown".into()
}
