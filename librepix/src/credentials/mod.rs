//! Repository credentials.
//!
//! A [`CredentialForm`] holds what the user typed; [`CredentialForm::validate`]
//! turns it into trimmed [`Credentials`] with a normalized folder path.

use crate::error::{RepixError, Result};
use std::fmt;


/// Message shown when a required credential field is blank.
pub const MISSING_CREDENTIALS: &str = "Please fill in GitHub token, username, and repository name";

/// Raw credential inputs, exactly as entered.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialForm {
    pub token: String,
    pub owner: String,
    pub repository: String,
    pub folder: String,
}

impl fmt::Debug for CredentialForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialForm")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("folder", &self.folder)
            .finish()
    }
}

impl CredentialForm {
    /// Creates a form from the four inputs.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::credentials::CredentialForm;
    ///
    /// let form = CredentialForm::new("ghp_x", "octocat", "pictures", "images/");
    /// assert!(form.validate().is_ok());
    /// ```
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repository: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            owner: owner.into(),
            repository: repository.into(),
            folder: folder.into(),
        }
    }

    /// Trims every field and checks that token, owner and repository are set.
    ///
    /// The folder is trimmed and loses exactly one trailing slash; an empty
    /// folder means the repository root.
    ///
    /// # Errors
    ///
    /// Returns [`RepixError::Validation`] if token, owner or repository is blank.
    pub fn validate(&self) -> Result<Credentials> {
        let token = self.token.trim();
        let owner = self.owner.trim();
        let repository = self.repository.trim();

        if token.is_empty() || owner.is_empty() || repository.is_empty() {
            return Err(RepixError::validation(MISSING_CREDENTIALS));
        }

        Ok(Credentials {
            token: token.to_string(),
            owner: owner.to_string(),
            repository: repository.to_string(),
            folder: normalize_folder(&self.folder),
        })
    }
}

/// Validated credentials for one repository folder.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    owner: String,
    repository: String,
    folder: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("folder", &self.folder)
            .finish()
    }
}

impl Credentials {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Normalized folder path, empty for the repository root.
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Path of `file_name` inside the configured folder.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::credentials::CredentialForm;
    ///
    /// let creds = CredentialForm::new("t", "o", "r", "images/").validate().unwrap();
    /// assert_eq!(creds.file_path("cat.png"), "images/cat.png");
    ///
    /// let root = CredentialForm::new("t", "o", "r", "").validate().unwrap();
    /// assert_eq!(root.file_path("cat.png"), "cat.png");
    /// ```
    pub fn file_path(&self, file_name: &str) -> String {
        if self.folder.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.folder, file_name)
        }
    }

    /// Returns the Authorization header value for these credentials.
    pub fn to_header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Trims the folder and removes exactly one trailing slash.
fn normalize_folder(folder: &str) -> String {
    let folder = folder.trim();
    folder.strip_suffix('/').unwrap_or(folder).to_string()
}
