// probity-core/src/infrastructure/logs.rs

use std::path::{Path, PathBuf};

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, read_if_exists};

/// Free-text run log (`test_logs.out` by default).
#[derive(Debug, Clone)]
pub struct LogArtifact {
    path: PathBuf,
}

impl LogArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, content: &str) -> Result<(), InfrastructureError> {
        atomic_write(&self.path, content)
    }

    /// Current content, empty when the log was never written.
    pub fn read(&self) -> Result<String, InfrastructureError> {
        Ok(read_if_exists(&self.path)?.unwrap_or_default())
    }

    /// Puts externally supplied text ahead of the existing log.
    pub fn insert(&self, inserted: &str) -> Result<(), InfrastructureError> {
        if inserted.is_empty() {
            return Ok(());
        }
        let existing = self.read()?;
        self.write(&format!("{}\n{}", inserted, existing))
    }
}
