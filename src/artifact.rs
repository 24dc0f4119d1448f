//! Temporary artifact lifecycle
//!
//! Each successful transformation produces one uniquely named file that the
//! caller can hand off for download. Lifecycle is create-on-success,
//! best-effort delete after use.

use crate::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store artifacts in the platform temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    /// Write `bytes` to a uniquely named file and return its path.
    ///
    /// Bytes go through an anonymous staging file first; a failed write is
    /// cleaned up on drop and never leaves a partial artifact at the final
    /// path.
    pub fn store(&self, bytes: &[u8], extension: &str) -> Result<PathBuf> {
        let mut staged = tempfile::NamedTempFile::new_in(&self.dir)?;
        staged.write_all(bytes)?;
        staged.flush()?;

        let path = self
            .dir
            .join(format!("transformed_{}.{}", Uuid::new_v4(), extension));
        staged.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Stored artifact ({} bytes) at {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Best-effort removal of an artifact after it has been handed off.
pub fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!("Failed to remove artifact {}: {}", path.display(), e);
    }
}
