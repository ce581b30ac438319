//! Content-addressed resource blobs.
//!
//! Each resource captured during recording is written once to the resources
//! directory under a file named by the hash of its bytes. Files are never
//! modified afterwards, so a read either sees the full content or nothing.

use crate::error::{Result, TraceError};
use std::io;
use std::path::{Path, PathBuf};

/// Resolves a content hash to the stored bytes.
pub trait ResourceStore {
    /// Bytes stored under `sha1`.
    ///
    /// Fails with [`TraceError::ResourceNotFound`] when nothing is stored under
    /// the hash, [`TraceError::InvalidHash`] when `sha1` cannot name a file in
    /// the store, and [`TraceError::Io`] for any other read failure.
    fn resource_content(&self, sha1: &str) -> Result<Vec<u8>>;
}

/// Reads resources from a directory of hash-named files.
#[derive(Debug, Clone)]
pub struct DiskResourceStore {
    resources_dir: PathBuf,
}

impl DiskResourceStore {
    pub fn new(resources_dir: impl Into<PathBuf>) -> Self {
        Self {
            resources_dir: resources_dir.into(),
        }
    }

    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    /// Whether a blob for `sha1` is present.
    pub fn has_resource(&self, sha1: &str) -> bool {
        self.resource_path(sha1)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    fn resource_path(&self, sha1: &str) -> Result<PathBuf> {
        validate_hash(sha1)?;
        Ok(self.resources_dir.join(sha1))
    }
}

impl ResourceStore for DiskResourceStore {
    fn resource_content(&self, sha1: &str) -> Result<Vec<u8>> {
        let path = self.resource_path(sha1)?;
        match std::fs::read(&path) {
            Ok(bytes) => {
                tracing::trace!("Read resource {} ({} bytes)", sha1, bytes.len());
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Resource {} not found in {:?}", sha1, self.resources_dir);
                Err(TraceError::ResourceNotFound(sha1.to_string()))
            }
            Err(e) => Err(TraceError::Io(e)),
        }
    }
}

/// A hash names a single file inside the resources directory.
fn validate_hash(sha1: &str) -> Result<()> {
    if sha1.is_empty() || sha1 == "." || sha1 == ".." || sha1.contains(['/', '\\', '\0']) {
        return Err(TraceError::InvalidHash(sha1.to_string()));
    }
    Ok(())
}
