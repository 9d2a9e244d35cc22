//! HTTP client for the GitHub Contents API.
//!
//! This module provides a thin client built on reqwest for the three
//! per-path operations the Contents API exposes (GET, PUT, DELETE on
//! `/repos/{owner}/{repo}/contents/{path}`) plus an unauthenticated download
//! of a file's raw bytes.

use crate::credentials::Credentials;
use crate::error::{RepixError, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[cfg(test)]
mod tests;

/// Media type requested from the Contents API.
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Default Contents API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Kind of a directory listing entry, from its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Unknown,
}

/// One element of a directory listing, as returned by the API.
#[derive(Debug, Clone, Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: EntryKind,
    #[serde(default)]
    size: u64,
    sha: String,
    download_url: Option<String>,
}

/// A file found in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileEntry {
    /// File name (e.g., "cat.png")
    pub name: String,
    /// Full path within the repository (e.g., "images/cat.png")
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// Direct, unauthenticated download URL
    pub download_url: Option<String>,
    /// Blob sha of the current content
    pub sha: String,
}

/// A single file fetched from the contents endpoint, including its content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
    pub sha: String,
    pub download_url: Option<String>,
    /// Base64 content, wrapped at 60 columns by the API
    #[serde(default)]
    pub content: Option<String>,
}

/// Outcome of probing a path for an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistingFile {
    /// A file exists at the path with this sha.
    Found { sha: String },
    /// Nothing exists at the path (404).
    NotFound,
}

impl ExistingFile {
    pub fn sha(&self) -> Option<&str> {
        match self {
            Self::Found { sha } => Some(sha),
            Self::NotFound => None,
        }
    }
}

/// Body of a create-or-update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteRequest {
    pub message: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Body of a delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteRequest {
    pub message: String,
    pub sha: String,
}

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use librepix::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_api_url("https://github.example.com/api/v3")
///     .with_timeout(60);
/// assert_eq!(config.timeout_seconds, Some(60));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Contents API base URL (default: https://api.github.com)
    pub api_url: String,
    /// Request timeout in seconds (default: none)
    pub timeout_seconds: Option<u64>,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
            max_idle_per_host: 10,
        }
    }
}

/// `repix/<version>`
pub fn default_user_agent() -> String {
    format!("repix/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Contents API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Sets the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }
}

/// HTTP client for Contents API operations.
#[derive(Debug, Clone)]
pub struct ContentsClient {
    http_client: ReqwestClient,
    api_url: Url,
}

impl ContentsClient {
    /// Creates a client for api.github.com with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RepixError::Config`] if the API URL does not parse, or
    /// [`RepixError::Fetch`] if the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let api_url = Url::parse(config.api_url.trim()).map_err(|e| {
            RepixError::config_with_source(
                format!("Invalid API URL '{}'", config.api_url),
                None,
                e,
            )
        })?;

        let mut builder = ReqwestClient::builder()
            .user_agent(config.user_agent)
            .pool_max_idle_per_host(config.max_idle_per_host);
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let http_client = builder
            .build()
            .map_err(|e| RepixError::fetch_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            api_url,
        })
    }

    /// Returns the Contents API base URL.
    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    /// Builds `/repos/{owner}/{repo}/contents/{path}`, percent-encoding each segment.
    ///
    /// An empty `path` addresses the repository root.
    pub fn contents_url(&self, credentials: &Credentials, path: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RepixError::config(
                    format!("API URL '{}' cannot carry a path", self.api_url),
                    None,
                )
            })?
            .pop_if_empty()
            .extend(["repos", credentials.owner(), credentials.repository(), "contents"])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    fn authorized(&self, method: Method, url: Url, credentials: &Credentials) -> RequestBuilder {
        tracing::debug!(%method, %url, "contents api request");
        self.http_client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, credentials.to_header_value())
            .header(reqwest::header::ACCEPT, GITHUB_MEDIA_TYPE)
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(Self::translate_reqwest_error)
    }

    /// Lists the files in the credentials' folder (or the repository root).
    ///
    /// Subdirectories and other non-file entries are dropped.
    ///
    /// # Errors
    ///
    /// - [`RepixError::NotFound`] if the repository or folder does not exist
    /// - [`RepixError::Api`] on any other non-2xx status
    /// - [`RepixError::Format`] if the path resolves to a single file
    /// - [`RepixError::Fetch`] on network failure
    pub async fn list_directory(&self, credentials: &Credentials) -> Result<Vec<RemoteFileEntry>> {
        let url = self.contents_url(credentials, credentials.folder())?;
        let response = Self::send(self.authorized(Method::GET, url, credentials)).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RepixError::not_found(
                "Repository or folder not found. Check your credentials and folder path.",
            ));
        }
        if !status.is_success() {
            return Err(RepixError::api(
                format!("GitHub API error: {}", status.as_u16()),
                status.as_u16(),
            ));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            RepixError::format_with_source("Invalid response format from GitHub API", e)
        })?;
        if !body.is_array() {
            return Err(RepixError::format("Invalid response format from GitHub API"));
        }

        let entries: Vec<ContentEntry> = serde_json::from_value(body).map_err(|e| {
            RepixError::format_with_source("Invalid response format from GitHub API", e)
        })?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| RemoteFileEntry {
                name: entry.name,
                path: entry.path,
                size: entry.size,
                download_url: entry.download_url,
                sha: entry.sha,
            })
            .collect())
    }

    /// Fetches a file's metadata and base64 content.
    ///
    /// # Errors
    ///
    /// - [`RepixError::Fetch`] on network failure or any non-2xx status
    /// - [`RepixError::Format`] if the path is a directory or the body is malformed
    pub async fn fetch_file(&self, credentials: &Credentials, path: &str) -> Result<RemoteFile> {
        let url = self.contents_url(credentials, path)?;
        let response = Self::send(self.authorized(Method::GET, url, credentials)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepixError::fetch(
                format!("Failed to fetch file (HTTP {})", status.as_u16()),
                Some(status.as_u16()),
            ));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            RepixError::format_with_source("Invalid response format from GitHub API", e)
        })?;
        if !body.is_object() {
            return Err(RepixError::format(format!("'{}' is not a file", path)));
        }

        serde_json::from_value(body).map_err(|e| {
            RepixError::format_with_source("Invalid response format from GitHub API", e)
        })
    }

    /// Looks up the sha of whatever currently exists at `path`.
    ///
    /// A 404 is an ordinary [`ExistingFile::NotFound`] outcome.
    ///
    /// # Errors
    ///
    /// - [`RepixError::Api`] on any non-2xx status other than 404
    /// - [`RepixError::Format`] if the body carries no sha
    /// - [`RepixError::Fetch`] on network failure
    pub async fn probe_existing(
        &self,
        credentials: &Credentials,
        path: &str,
    ) -> Result<ExistingFile> {
        #[derive(Deserialize)]
        struct ShaOnly {
            sha: String,
        }

        let url = self.contents_url(credentials, path)?;
        let response = Self::send(self.authorized(Method::GET, url, credentials)).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(ExistingFile::NotFound);
        }
        let response = Self::check_api_status(response).await?;

        let found: ShaOnly = response.json().await.map_err(|e| {
            RepixError::format_with_source("Existing file response carries no sha", e)
        })?;
        Ok(ExistingFile::Found { sha: found.sha })
    }

    /// Creates or updates the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`RepixError::Api`] with the API's message on any non-2xx status
    /// - [`RepixError::Fetch`] on network failure
    pub async fn put_file(
        &self,
        credentials: &Credentials,
        path: &str,
        request: &WriteRequest,
    ) -> Result<()> {
        let url = self.contents_url(credentials, path)?;
        let response =
            Self::send(self.authorized(Method::PUT, url, credentials).json(request)).await?;
        Self::check_api_status(response).await?;
        Ok(())
    }

    /// Deletes the file at `path`; `request.sha` must be its current sha.
    ///
    /// # Errors
    ///
    /// - [`RepixError::Api`] if the API rejects the request (e.g. stale sha)
    /// - [`RepixError::Fetch`] on network failure
    pub async fn delete_file(
        &self,
        credentials: &Credentials,
        path: &str,
        request: &DeleteRequest,
    ) -> Result<()> {
        let url = self.contents_url(credentials, path)?;
        let response =
            Self::send(self.authorized(Method::DELETE, url, credentials).json(request)).await?;

        let status = response.status();
        if !status.is_success() {
            let detail = Self::api_message(response).await;
            let message = match detail {
                Some(detail) => format!("GitHub API rejected the delete request: {}", detail),
                None => "GitHub API rejected the delete request".to_string(),
            };
            return Err(RepixError::api(message, status.as_u16()));
        }
        Ok(())
    }

    /// Downloads raw bytes from a direct-download URL, without credentials.
    ///
    /// # Errors
    ///
    /// Returns [`RepixError::Fetch`] on network failure or any non-2xx status.
    pub async fn download(&self, download_url: &str) -> Result<Vec<u8>> {
        // Private-repo download URLs carry a short-lived token in the query.
        let logged_url = download_url.split('?').next().unwrap_or(download_url);
        tracing::debug!(url = logged_url, "download request");
        let response = Self::send(self.http_client.get(download_url)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepixError::fetch(
                format!("Failed to fetch image (HTTP {})", status.as_u16()),
                Some(status.as_u16()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RepixError::fetch_with_source("Failed to read image response", e))?;
        Ok(bytes.to_vec())
    }

    /// Reads the `message` field of an error body, if there is one.
    async fn api_message(response: Response) -> Option<String> {
        let body: ApiErrorBody = response.json().await.ok()?;
        body.message.filter(|m| !m.is_empty())
    }

    /// Passes 2xx responses through; anything else becomes an API error.
    async fn check_api_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = Self::api_message(response)
            .await
            .unwrap_or_else(|| format!("GitHub API error: {}", status.as_u16()));
        Err(RepixError::api(message, status.as_u16()))
    }

    /// Translates a reqwest error into a RepixError.
    ///
    /// The reported URL never includes its query string, and the source error
    /// carries no URL at all.
    fn translate_reqwest_error(error: reqwest::Error) -> RepixError {
        let target = error
            .url()
            .map(|u| {
                let mut u = u.clone();
                u.set_query(None);
                u.to_string()
            })
            .unwrap_or_else(|| "the remote store".to_string());
        let error = error.without_url();

        if error.is_timeout() {
            RepixError::fetch_with_source(format!("Request to {} timed out", target), error)
        } else if error.is_connect() {
            RepixError::fetch_with_source(format!("Failed to connect to {}", target), error)
        } else {
            RepixError::fetch_with_source(
                format!("Network error communicating with {}", target),
                error,
            )
        }
    }
}
