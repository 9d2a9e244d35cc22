//! Repix - GitHub Repository Image Manager Library
//!
//! Repix manages image files stored in a folder of a GitHub repository
//! through the GitHub Contents API: list, preview, upload, overwrite and
//! delete.
//!
//! # Quick Start
//!
//! ```no_run
//! use librepix::{CredentialForm, PendingFile, RepositoryImageClient, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RepositoryImageClient::builder().build()?;
//!     let mut session = Session::new(CredentialForm::new(
//!         "ghp_token", "octocat", "pictures", "images",
//!     ));
//!
//!     // Stage a file and upload it as images/cat.png
//!     session.select_file(PendingFile::from_bytes("cat.png", b"\x89PNG"));
//!     let report = client.upsert_file(&mut session).await?;
//!     println!("{:?} {}", report.action, report.path);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`RepositoryImageClient`] - Entry point for every operation
//! - [`Session`] - Per-user state (credentials, staged file, listing, status, preview)
//! - [`CredentialForm`] / [`Credentials`] - Raw and validated repository credentials
//! - [`PendingFile`] - A file staged for upload
//! - [`ListingView`] - What a listing renders as
//! - [`Config`] - Layered configuration

#![warn(clippy::all)]

/// Returns the librepix crate version.
///
/// # Examples
///
/// ```
/// let version = librepix::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// High-level public API
mod repix;
pub use repix::{
    DeleteOutcome, RepositoryImageClient, RepositoryImageClientBuilder, UpsertReport, WriteAction,
};

pub use client::RemoteFileEntry;
pub use config::Config;
pub use content::PendingFile;
pub use credentials::{CredentialForm, Credentials};
pub use error::{RepixError, Result};
pub use preview::Preview;
pub use session::{Confirm, Session};
pub use status::{StatusBanner, StatusLevel, StatusMessage};
pub use view::ListingView;

pub mod client;
pub mod config;
pub mod content;
pub mod credentials;
pub mod error;
pub mod preview;
pub mod session;
pub mod status;
pub mod view;
