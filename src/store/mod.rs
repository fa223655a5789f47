//! src/store/mod.rs
use crate::domain::Registry;
use std::path::PathBuf;

mod json_file;
pub use json_file::{JsonFileStore, StagedWrite};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("The registry document at {} could not be accessed", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("The registry document at {} is malformed", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable home of the [`Registry`].
///
/// Implementations must make `save` all-or-nothing: a concurrent `load` returns either the
/// previous or the new registry, never a mix. Neither method serializes writers; that is
/// the job of [`crate::registry::SubscriberRegistry`].
pub trait RegistryStore: Send + Sync {
    /// Returns the current registry, creating and persisting an empty one on first use.
    fn load(&self) -> Result<Registry, StoreError>;

    /// Replaces the persisted registry as a whole.
    fn save(&self, registry: &Registry) -> Result<(), StoreError>;
}

impl<S: RegistryStore + ?Sized> RegistryStore for &S {
    fn load(&self) -> Result<Registry, StoreError> {
        (**self).load()
    }

    fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        (**self).save(registry)
    }
}
