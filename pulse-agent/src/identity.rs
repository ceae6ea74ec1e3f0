//! Persistent device identity.
//!
//! One key-value pair outlives the sampling loop: a random identifier
//! generated on first use and kept in a plain file. Single process, single
//! writer; the filesystem is the only lock needed.

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

/// File-backed device identifier store.
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `<local data dir>/pulse/device_id`.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pulse")
            .join("device_id")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the stored identifier, generating and persisting a new one
    /// if none exists yet.
    pub fn load_or_create(&self) -> io::Result<String> {
        if let Ok(existing) = std::fs::read_to_string(&self.path) {
            let id = existing.trim();
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }

        let id = Uuid::new_v4().to_string();

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, &id)?;

        info!(path = %self.path.display(), "generated new device identifier");
        Ok(id)
    }
}
