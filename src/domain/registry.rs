//! src/domain/registry.rs
use crate::domain::{Subscriber, SubscriberEmail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The whole subscriber list, in insertion order. Persisted as one document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Registry {
    #[serde(default)]
    subscribers: Vec<Subscriber>,
}

impl Registry {
    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Stored records are compared after the same trim and lowercase that
    /// [`SubscriberEmail::parse`] applies, so hand-edited entries still count.
    pub fn contains(&self, email: &SubscriberEmail) -> bool {
        self.subscribers
            .iter()
            .any(|subscriber| subscriber.email.trim().to_lowercase() == email.as_ref())
    }

    /// Appends without checking membership; callers hold the writer lock and call
    /// [`Registry::contains`] first.
    pub fn push(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Every distinct, valid address in first-seen order.
    ///
    /// Records are normalized again on the way out. A record that no longer parses is
    /// skipped with a warning instead of failing the caller.
    #[tracing::instrument(name = "Collect distinct subscriber emails", skip(self))]
    pub fn distinct_emails(&self) -> Vec<SubscriberEmail> {
        let mut seen = HashSet::new();
        let mut emails = Vec::new();

        for subscriber in &self.subscribers {
            match SubscriberEmail::parse(subscriber.email.clone()) {
                Ok(email) => {
                    if seen.insert(email.clone()) {
                        emails.push(email);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        error.cause_chain = ?e,
                        "Skipping subscriber {:?} because {}", subscriber.email, e);
                }
            }
        }

        emails
    }
}

impl FromIterator<Subscriber> for Registry {
    fn from_iter<I: IntoIterator<Item = Subscriber>>(iter: I) -> Self {
        Self {
            subscribers: iter.into_iter().collect(),
        }
    }
}
