//! Scoped image previews.
//!
//! A [`Preview`] owns a temporary file holding the downloaded bytes. The file
//! is removed when the preview is dropped, which happens when a newer preview
//! replaces it or when the owning session goes away.

use crate::error::{RepixError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;


/// A downloaded image held in a temporary file.
#[derive(Debug)]
pub struct Preview {
    file_name: String,
    len: usize,
    file: NamedTempFile,
}

impl Preview {
    /// Writes `bytes` to a fresh temporary file named after `file_name`'s extension.
    ///
    /// # Errors
    ///
    /// Returns [`RepixError::Io`] if the temporary file cannot be created or written.
    pub fn create(file_name: &str, bytes: &[u8]) -> Result<Self> {
        let suffix = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("repix-preview-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| RepixError::io("Failed to create preview file", e))?;
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| RepixError::io("Failed to write preview file", e))?;

        tracing::debug!(file_name, path = %file.path().display(), "preview created");
        Ok(Self {
            file_name: file_name.to_string(),
            len: bytes.len(),
            file,
        })
    }

    /// Name of the remote file being previewed.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Location of the preview on local disk, valid while `self` lives.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of bytes downloaded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copies the preview to `destination`, which outlives the preview.
    pub fn save_to(&self, destination: &Path) -> Result<PathBuf> {
        std::fs::copy(self.path(), destination).map_err(|e| {
            RepixError::io(
                format!("Failed to save preview to {}", destination.display()),
                e,
            )
        })?;
        Ok(destination.to_path_buf())
    }
}
