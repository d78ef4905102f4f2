use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::types::StoredArtifact;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error("artifacts directory missing or not writable: {0}")]
    ArtifactsDir(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<io::Error> for PersistError {
    fn from(err: io::Error) -> Self {
        PersistError::Io(err.to_string())
    }
}

/// Ensure the artifacts directory exists; create if missing.
pub fn ensure_artifacts_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::ArtifactsDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::ArtifactsDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::ArtifactsDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::ArtifactsDir(e.to_string()))?;
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then
/// renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_artifacts_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present to keep determinism.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target)
            .map_err(|e| PersistError::Io(e.error.to_string()))?;
        Ok(target)
    }
}

/// Destination for response artifacts. Each save replaces any previous file
/// with the same derived name.
pub struct ArtifactStore {
    writer: AtomicFileWriter,
}

impl ArtifactStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn save(&self, file_name: &str, content: &[u8]) -> Result<StoredArtifact, PersistError> {
        let path = self.writer.write(file_name, content)?;
        Ok(StoredArtifact {
            file_name: file_name.to_string(),
            path,
            bytes: content.len() as u64,
        })
    }
}
