//! Session-local state.
//!
//! Everything the user builds up during one session lives in [`Session`]:
//! the credential form, the filename field, the staged upload, the last
//! listing, the status banner and the current preview. Operations on
//! [`crate::RepositoryImageClient`] take the session by `&mut` reference, so
//! two operations can never interleave on the same session.

use crate::client::RemoteFileEntry;
use crate::content::PendingFile;
use crate::credentials::{CredentialForm, Credentials};
use crate::error::{RepixError, Result};
use crate::preview::Preview;
use crate::status::StatusBanner;
use crate::view::ListingView;
use std::time::Duration;

#[cfg(test)]
mod tests;

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// State of one user session.
#[derive(Debug, Default)]
pub struct Session {
    form: CredentialForm,
    credentials: Option<Credentials>,
    file_name: String,
    pending: Option<PendingFile>,
    files: Vec<RemoteFileEntry>,
    listing: Option<ListingView>,
    status: StatusBanner,
    preview: Option<Preview>,
}

impl Session {
    /// Starts a session with the given credential inputs.
    pub fn new(form: CredentialForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Sets how long status messages stay visible.
    pub fn with_status_ttl(mut self, ttl: Duration) -> Self {
        self.status = StatusBanner::new(ttl);
        self
    }

    pub fn form(&self) -> &CredentialForm {
        &self.form
    }

    /// Mutable access to the credential inputs; changes apply on the next validation.
    pub fn form_mut(&mut self) -> &mut CredentialForm {
        &mut self.form
    }

    /// Credentials from the last successful validation.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Checks the credential form, caching the normalized credentials.
    ///
    /// On failure an error status is posted and `false` is returned.
    pub fn validate_credentials(&mut self) -> bool {
        self.require_credentials().is_ok()
    }

    /// Like [`Session::validate_credentials`], returning the credentials or the error.
    pub(crate) fn require_credentials(&mut self) -> Result<Credentials> {
        match self.form.validate() {
            Ok(credentials) => {
                self.credentials = Some(credentials.clone());
                Ok(credentials)
            }
            Err(e) => {
                self.credentials = None;
                self.status.error(e.to_string());
                Err(e)
            }
        }
    }

    /// Current value of the filename field.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    /// The file staged for upload.
    pub fn pending(&self) -> Option<&PendingFile> {
        self.pending.as_ref()
    }

    /// Stages `file` for upload, replacing any earlier one, and fills the filename field.
    pub fn select_file(&mut self, file: PendingFile) {
        self.file_name = file.display_name().to_string();
        self.status
            .success(format!("File selected: {}", file.display_name()));
        self.pending = Some(file);
    }

    /// Stages remote content for an overwrite under `file_name`.
    pub(crate) fn stage_for_edit(&mut self, file_name: &str, file: PendingFile) {
        self.file_name = file_name.to_string();
        self.pending = Some(file);
    }

    /// Clears the staged file and the filename field.
    pub fn clear_pending(&mut self) {
        self.pending = None;
        self.file_name.clear();
    }

    /// Files from the last successful listing.
    pub fn files(&self) -> &[RemoteFileEntry] {
        &self.files
    }

    /// Looks up a listed file by name.
    pub fn find_file(&self, name: &str) -> Option<&RemoteFileEntry> {
        self.files.iter().find(|entry| entry.name == name)
    }

    /// The listing view, [`ListingView::Loading`] until the first listing.
    pub fn listing(&self) -> &ListingView {
        self.listing.as_ref().unwrap_or(&ListingView::Loading)
    }

    pub(crate) fn set_listing(&mut self, view: ListingView, files: Vec<RemoteFileEntry>) {
        self.listing = Some(view);
        self.files = files;
    }

    pub fn status(&self) -> &StatusBanner {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusBanner {
        &mut self.status
    }

    /// The current preview, if any.
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Installs a new preview; the previous one is released.
    pub(crate) fn replace_preview(&mut self, preview: Preview) -> &Preview {
        self.preview.insert(preview)
    }

    /// Releases the current preview.
    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    /// Posts `context: error` to the banner and hands the error back.
    pub(crate) fn fail<T>(&mut self, context: &str, error: RepixError) -> Result<T> {
        self.status.error(format!("{}: {}", context, error));
        Err(error)
    }
}
