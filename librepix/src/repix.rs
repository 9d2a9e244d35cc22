//! High-level API for the Repix library.
//!
//! [`RepositoryImageClient`] implements every user-facing operation (list,
//! select, preview, load for edit, delete, upsert) against a [`Session`].
//! Each operation posts progress and outcome to the session's status banner
//! and also returns its result to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use librepix::{CredentialForm, RepositoryImageClient, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RepositoryImageClient::builder().build()?;
//!     let mut session = Session::new(CredentialForm::new(
//!         "ghp_token", "octocat", "pictures", "images",
//!     ));
//!
//!     for file in client.list_files(&mut session).await? {
//!         println!("{} ({} bytes)", file.name, file.size);
//!     }
//!     Ok(())
//! }
//! ```

use crate::client::{
    ClientConfig, ContentsClient, DeleteRequest, ExistingFile, RemoteFileEntry, WriteRequest,
};
use crate::config::Config;
use crate::content::PendingFile;
use crate::error::{RepixError, Result};
use crate::preview::Preview;
use crate::session::{Confirm, Session};
use crate::view::{ListingView, compute_listing_view};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

#[cfg(test)]
#[path = "repix_tests.rs"]
mod tests;

/// Whether an upsert created a new file or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAction {
    Created,
    Updated,
}

impl WriteAction {
    fn from_existing(existing: &ExistingFile) -> Self {
        match existing {
            ExistingFile::Found { .. } => Self::Updated,
            ExistingFile::NotFound => Self::Created,
        }
    }

    /// Verb used in the commit message.
    pub fn commit_verb(self) -> &'static str {
        match self {
            Self::Created => "Add",
            Self::Updated => "Update",
        }
    }

    /// Verb used in the success message.
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Created => "saved",
            Self::Updated => "updated",
        }
    }
}

/// Result of a successful upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertReport {
    pub file_name: String,
    pub path: String,
    pub action: WriteAction,
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
}

/// Implements the image-management operations over the Contents API.
#[derive(Debug, Clone)]
pub struct RepositoryImageClient {
    contents: ContentsClient,
    refresh_delay: Duration,
}

impl RepositoryImageClient {
    /// Create a builder for configuration.
    pub fn builder() -> RepositoryImageClientBuilder {
        RepositoryImageClientBuilder::new()
    }

    /// The underlying transport.
    pub fn contents(&self) -> &ContentsClient {
        &self.contents
    }

    pub fn refresh_delay(&self) -> Duration {
        self.refresh_delay
    }

    /// Lists the files in the session's folder and updates the listing view.
    ///
    /// An empty folder is a success with its own status message.
    ///
    /// # Errors
    ///
    /// [`RepixError::Validation`] for incomplete credentials, otherwise whatever
    /// [`ContentsClient::list_directory`] returns.
    pub async fn list_files(&self, session: &mut Session) -> Result<Vec<RemoteFileEntry>> {
        let credentials = session.require_credentials()?;

        session.status_mut().info("Loading images...");
        session.set_listing(ListingView::Loading, Vec::new());

        let result = self.contents.list_directory(&credentials).await;
        let view = compute_listing_view(&result);

        match result {
            Ok(files) => {
                if files.is_empty() {
                    session
                        .status_mut()
                        .success("No images found. Add one to get started!");
                } else {
                    session
                        .status_mut()
                        .success(format!("Successfully loaded {} image(s)", files.len()));
                }
                tracing::info!(folder = credentials.folder(), count = files.len(), "listed files");
                session.set_listing(view, files.clone());
                Ok(files)
            }
            Err(e) => {
                session.set_listing(view, Vec::new());
                session.status_mut().error(e.to_string());
                Err(e)
            }
        }
    }

    /// Reads a local file and stages it for upload.
    ///
    /// # Errors
    ///
    /// [`RepixError::Validation`] if the file cannot be read.
    pub async fn select_local_file(&self, session: &mut Session, path: &Path) -> Result<()> {
        match PendingFile::read_local(path).await {
            Ok(file) => {
                tracing::debug!(file = file.display_name(), "file selected");
                session.select_file(file);
                Ok(())
            }
            Err(e) => session.fail("Error selecting file", e),
        }
    }

    /// Downloads a file and shows it in the preview, releasing the previous one.
    ///
    /// # Errors
    ///
    /// [`RepixError::Fetch`] if the download fails.
    pub async fn preview_file<'s>(
        &self,
        session: &'s mut Session,
        file_name: &str,
        download_url: &str,
    ) -> Result<&'s Preview> {
        session.status_mut().info("Loading image...");

        let preview = match self.contents.download(download_url).await {
            Ok(bytes) => Preview::create(file_name, &bytes),
            Err(e) => Err(e),
        };

        match preview {
            Ok(preview) => {
                session
                    .status_mut()
                    .success(format!("Image loaded: {}", file_name));
                Ok(session.replace_preview(preview))
            }
            Err(e) => session.fail("Error loading image", e),
        }
    }

    /// Loads a remote file's content into the pending upload for an overwrite.
    ///
    /// # Errors
    ///
    /// [`RepixError::Validation`] for incomplete credentials, [`RepixError::Fetch`]
    /// if the file cannot be fetched, [`RepixError::Format`] if it has no inline
    /// content.
    pub async fn load_for_edit(
        &self,
        session: &mut Session,
        file_name: &str,
        file_path: &str,
    ) -> Result<()> {
        let credentials = session.require_credentials()?;
        session.status_mut().info("Loading image for editing...");

        let file = match self.contents.fetch_file(&credentials, file_path).await {
            Ok(file) => file,
            Err(e) => return session.fail("Error loading file for edit", e),
        };

        // Files over 1 MB come back without inline content.
        let content = match file.content.as_deref() {
            Some(content) if !content.trim().is_empty() => content,
            _ => {
                return session.fail(
                    "Error loading file for edit",
                    RepixError::format(format!("'{}' has no inline content", file_path)),
                );
            }
        };

        session.stage_for_edit(file_name, PendingFile::from_remote(file_name, content));
        session
            .status_mut()
            .success(format!("File loaded for editing: {}", file_name));
        Ok(())
    }

    /// Deletes a remote file after confirmation, then refreshes the listing.
    ///
    /// The current sha is fetched right before the delete request.
    ///
    /// # Errors
    ///
    /// [`RepixError::Validation`] for incomplete credentials,
    /// [`RepixError::Fetch`] if the sha lookup fails, [`RepixError::Api`] if the
    /// store rejects the delete.
    pub async fn delete_file<C: Confirm>(
        &self,
        session: &mut Session,
        file_name: &str,
        file_path: &str,
        confirm: &mut C,
    ) -> Result<DeleteOutcome> {
        let credentials = session.require_credentials()?;

        let prompt = format!("Are you sure you want to delete \"{}\"?", file_name);
        if !confirm.confirm(&prompt) {
            tracing::debug!(file_path, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        session.status_mut().info("Deleting image...");

        let sha = match self.contents.fetch_file(&credentials, file_path).await {
            Ok(file) => file.sha,
            Err(e) => {
                let error = RepixError::Fetch {
                    message: "Failed to fetch file for deletion".to_string(),
                    status_code: e.status_code(),
                    source: Some(Box::new(e)),
                };
                return session.fail("Error deleting image", error);
            }
        };

        let request = DeleteRequest {
            message: format!("Delete {}", file_name),
            sha,
        };
        if let Err(e) = self
            .contents
            .delete_file(&credentials, file_path, &request)
            .await
        {
            return session.fail("Error deleting image", e);
        }

        tracing::info!(file_path, "deleted file");
        session
            .status_mut()
            .success(format!("Image deleted: {}", file_name));

        // A failed refresh is reported through the listing view.
        let _ = self.list_files(session).await;
        Ok(DeleteOutcome::Deleted)
    }

    /// Creates or updates the pending file under the session's filename.
    ///
    /// The existing sha is probed first; a failed probe counts as "no existing
    /// file". On success the pending file and filename are cleared and the
    /// listing is refreshed after the configured delay.
    ///
    /// # Errors
    ///
    /// [`RepixError::Validation`] for incomplete credentials, a blank filename,
    /// no pending file or a pending payload that is not base64;
    /// [`RepixError::Api`] if the store rejects the write.
    pub async fn upsert_file(&self, session: &mut Session) -> Result<UpsertReport> {
        let credentials = session.require_credentials()?;

        let file_name = session.file_name().trim().to_string();
        let staged = session
            .pending()
            .map(|pending| (pending.base64_content().to_string(), pending.decoded_len()));
        let content = match staged {
            Some((content, Ok(_))) if !file_name.is_empty() => content,
            Some((_, Err(_))) => {
                return session.fail(
                    "Error uploading image",
                    RepixError::validation("The selected file is not valid base64 content"),
                );
            }
            _ => {
                return session.fail(
                    "Error uploading image",
                    RepixError::validation("Please select an image file and enter a filename"),
                );
            }
        };

        session.status_mut().info("Uploading image...");
        let path = credentials.file_path(&file_name);

        let existing = match self.contents.probe_existing(&credentials, &path).await {
            Ok(existing) => existing,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "sha probe failed, writing as a new file");
                ExistingFile::NotFound
            }
        };
        let action = WriteAction::from_existing(&existing);

        let request = WriteRequest {
            message: format!("{} {}", action.commit_verb(), file_name),
            content,
            sha: existing.sha().map(str::to_string),
        };
        if let Err(e) = self.contents.put_file(&credentials, &path, &request).await {
            return session.fail("Error uploading image", e);
        }

        tracing::info!(path = %path, ?action, "wrote file");
        session.status_mut().success(format!(
            "Image {} successfully: {}",
            action.past_tense(),
            file_name
        ));
        session.clear_pending();

        // Let the store settle before reading the folder back.
        if !self.refresh_delay.is_zero() {
            tokio::time::sleep(self.refresh_delay).await;
        }
        let _ = self.list_files(session).await;

        Ok(UpsertReport {
            file_name,
            path,
            action,
        })
    }
}

/// Builder for [`RepositoryImageClient`].
#[derive(Debug, Clone)]
pub struct RepositoryImageClientBuilder {
    client_config: ClientConfig,
    refresh_delay: Duration,
}

impl Default for RepositoryImageClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryImageClientBuilder {
    pub fn new() -> Self {
        Self {
            client_config: ClientConfig::default(),
            refresh_delay: Duration::from_millis(500),
        }
    }

    /// Takes API URL, network and session settings from a loaded [`Config`].
    pub fn with_config(mut self, config: &Config) -> Self {
        self.client_config = config.client_config();
        self.refresh_delay = config.session.refresh_delay();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.client_config = self.client_config.with_api_url(url);
        self
    }

    pub fn with_client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    /// Delay between a successful upload and the listing refresh.
    pub fn refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub fn build(self) -> Result<RepositoryImageClient> {
        Ok(RepositoryImageClient {
            contents: ContentsClient::with_config(self.client_config)?,
            refresh_delay: self.refresh_delay,
        })
    }
}
