//! Files staged for upload.
//!
//! A [`PendingFile`] is either read from local disk (and carried as a data URL
//! plus its base64 payload) or loaded from the remote store for re-editing.

use crate::error::{RepixError, Result};
use base64::{Engine as _, engine::general_purpose};
use std::path::Path;


/// Returns the base64 payload of a data URL.
///
/// Everything after the first comma is the payload. Input without a comma (or
/// with nothing after it) is returned unchanged.
///
/// # Examples
///
/// ```
/// use librepix::content::extract_base64_payload;
///
/// assert_eq!(extract_base64_payload("data:image/png;base64,AAAA"), "AAAA");
/// assert_eq!(extract_base64_payload("AAAA"), "AAAA");
/// ```
pub fn extract_base64_payload(encoded: &str) -> &str {
    match encoded.split_once(',') {
        Some((_, payload)) if !payload.is_empty() => payload,
        _ => encoded,
    }
}

/// Builds a `data:` URL for `bytes`, guessing the media type from `file_name`.
pub fn to_data_url(file_name: &str, bytes: &[u8]) -> String {
    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
    format!(
        "data:{};base64,{}",
        mime.essence_str(),
        general_purpose::STANDARD.encode(bytes)
    )
}

/// A file staged client-side for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    display_name: String,
    raw_content: Option<String>,
    base64_content: String,
}

impl PendingFile {
    /// Stages a file from its data-URL encoding.
    pub fn from_data_url(display_name: impl Into<String>, data_url: impl Into<String>) -> Self {
        let data_url = data_url.into();
        let base64_content = extract_base64_payload(&data_url).to_string();
        Self {
            display_name: display_name.into(),
            raw_content: Some(data_url),
            base64_content,
        }
    }

    /// Stages raw bytes, encoding them the way a browser file reader would.
    pub fn from_bytes(display_name: impl Into<String>, bytes: &[u8]) -> Self {
        let display_name = display_name.into();
        let data_url = to_data_url(&display_name, bytes);
        Self {
            display_name,
            raw_content: Some(data_url),
            base64_content: general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Stages base64 content loaded from the remote store.
    ///
    /// The Contents API wraps content at 60 columns; the line breaks are dropped.
    pub fn from_remote(display_name: impl Into<String>, base64_content: &str) -> Self {
        Self {
            display_name: display_name.into(),
            raw_content: None,
            base64_content: base64_content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect(),
        }
    }

    /// Reads a local file into a pending upload named after the file.
    ///
    /// # Errors
    ///
    /// Returns [`RepixError::Validation`] if the path has no file name or
    /// cannot be read.
    pub async fn read_local(path: &Path) -> Result<Self> {
        let display_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                RepixError::validation(format!("Not a file path: {}", path.display()))
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            RepixError::validation(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(Self::from_bytes(display_name, &bytes))
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The data URL this file was read from, if it came from local disk.
    pub fn raw_content(&self) -> Option<&str> {
        self.raw_content.as_deref()
    }

    pub fn base64_content(&self) -> &str {
        &self.base64_content
    }

    /// Number of bytes the base64 payload decodes to.
    ///
    /// # Errors
    ///
    /// Returns [`RepixError::Format`] if the payload is not valid base64.
    pub fn decoded_len(&self) -> Result<usize> {
        general_purpose::STANDARD
            .decode(&self.base64_content)
            .map(|bytes| bytes.len())
            .map_err(|e| RepixError::format_with_source("Pending file is not valid base64", e))
    }
}
