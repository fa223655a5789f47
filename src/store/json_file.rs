//! src/store/json_file.rs
use crate::domain::Registry;
use crate::store::{RegistryStore, StoreError};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Keeps the registry as a single pretty-printed JSON document on the local filesystem.
///
/// Writes go to a temporary file next to the document and are renamed over it once
/// flushed and synced, so the document on disk is always a complete one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

/// A fully written and synced registry that has not replaced the document yet.
///
/// Dropping it without calling [`StagedWrite::commit`] deletes the temporary file and
/// leaves the current document untouched.
#[derive(Debug)]
pub struct StagedWrite {
    file: NamedTempFile,
    target: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `registry` to a temporary file in the document's directory.
    pub fn stage(&self, registry: &Registry) -> Result<StagedWrite, StoreError> {
        let file = NamedTempFile::new_in(self.directory()).map_err(|e| self.unavailable(e))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, registry)
            .map_err(|e| self.unavailable(e.into()))?;
        writer.flush().map_err(|e| self.unavailable(e))?;

        let file = writer
            .into_inner()
            .map_err(|e| self.unavailable(e.into_error()))?;
        file.as_file().sync_all().map_err(|e| self.unavailable(e))?;

        Ok(StagedWrite {
            file,
            target: self.path.clone(),
        })
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn unavailable(&self, source: io::Error) -> StoreError {
        StoreError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<Option<Registry>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.unavailable(e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    /// Creates an empty document unless somebody else created one first.
    #[tracing::instrument(name = "Initializing the registry document", skip(self), fields(path = %self.path.display()))]
    fn initialize(&self) -> Result<Registry, StoreError> {
        let registry = Registry::default();

        match self.stage(&registry)?.commit_if_absent() {
            Ok(()) => Ok(registry),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => self
                .read()?
                .ok_or_else(|| self.unavailable(io::ErrorKind::NotFound.into())),
            Err(e) => Err(self.unavailable(e)),
        }
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> Result<Registry, StoreError> {
        match self.read()? {
            Some(registry) => Ok(registry),
            None => self.initialize(),
        }
    }

    fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        self.stage(registry)?.commit()
    }
}

impl StagedWrite {
    /// Atomically replaces the target document with the staged one.
    pub fn commit(self) -> Result<(), StoreError> {
        let target = self.target;
        self.file
            .persist(&target)
            .map_err(|e| StoreError::Unavailable {
                path: target.clone(),
                source: e.error,
            })?;
        Ok(())
    }

    fn commit_if_absent(self) -> io::Result<()> {
        self.file
            .persist_noclobber(&self.target)
            .map(|_| ())
            .map_err(|e| e.error)
    }
}
