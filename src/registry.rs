//! src/registry.rs
use crate::domain::{NewSubscriber, Subscriber, SubscriberEmail};
use crate::store::{RegistryStore, StoreError};
use chrono::Utc;
use parking_lot::Mutex;

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("{0} is already subscribed")]
    AlreadySubscribed(SubscriberEmail),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The process-wide owner of the subscriber registry.
///
/// Built once at startup and shared by every worker. All mutations go through one writer
/// lock so that two subscriptions never interleave their load and save.
pub struct SubscriberRegistry {
    store: Box<dyn RegistryStore>,
    writer: Mutex<()>,
}

impl SubscriberRegistry {
    pub fn new(store: impl RegistryStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            writer: Mutex::new(()),
        }
    }

    #[tracing::instrument(
        name = "Appending a subscriber to the registry",
        skip(self, new_subscriber),
        fields(subscriber_email = %new_subscriber.email)
    )]
    pub fn subscribe(&self, new_subscriber: NewSubscriber) -> Result<Subscriber, RegistryError> {
        let _writer = self.writer.lock();

        let mut registry = self.store.load()?;
        if registry.contains(&new_subscriber.email) {
            return Err(RegistryError::AlreadySubscribed(new_subscriber.email));
        }

        let subscriber = Subscriber::new(new_subscriber, Utc::now());
        registry.push(subscriber.clone());
        self.store.save(&registry).map_err(|e| {
            tracing::error!("Failed to persist the registry: {:?}", e);
            e
        })?;

        Ok(subscriber)
    }

    #[tracing::instrument(name = "Counting subscribers", skip(self))]
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.store.load()?.len())
    }
}
