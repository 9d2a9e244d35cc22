//! Error types for Repix
//!
//! Every failure a session operation can hit maps onto one variant of
//! [`RepixError`]. Operations return these errors to their caller; the session
//! layer also turns them into a user-visible status message.

use thiserror::Error;


/// Main error type for Repix operations
#[derive(Error, Debug)]
pub enum RepixError {
    /// Missing or empty local input (credentials, filename, pending file)
    #[error("{message}")]
    Validation { message: String },

    /// The listed repository or folder does not exist (404)
    #[error("{message}")]
    NotFound { message: String, status_code: u16 },

    /// Any other non-2xx answer from the Contents API
    #[error("{message}")]
    Api { message: String, status_code: u16 },

    /// Network failure, or non-2xx on an auxiliary fetch (download, metadata)
    #[error("{message}")]
    Fetch {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The response did not have the expected shape
    #[error("{message}")]
    Format {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Local disk failure (preview temp files)
    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors (invalid config file or API URL)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for Repix operations
pub type Result<T> = std::result::Result<T, RepixError>;

impl RepixError {
    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::error::RepixError;
    ///
    /// let err = RepixError::validation("filename is required");
    /// assert!(matches!(err, RepixError::Validation { .. }));
    /// ```
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::error::RepixError;
    ///
    /// let err = RepixError::not_found("folder not found");
    /// assert_eq!(err.status_code(), Some(404));
    /// ```
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
            status_code: 404,
        }
    }

    /// Creates a new API error.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::error::RepixError;
    ///
    /// let err = RepixError::api("sha does not match", 409);
    /// assert!(matches!(err, RepixError::Api { status_code: 409, .. }));
    /// ```
    pub fn api<S: Into<String>>(message: S, status_code: u16) -> Self {
        Self::Api {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new fetch error, optionally carrying the HTTP status.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::error::RepixError;
    ///
    /// let err = RepixError::fetch("Failed to fetch image", Some(404));
    /// assert!(matches!(err, RepixError::Fetch { .. }));
    /// ```
    pub fn fetch<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        Self::Fetch {
            message: message.into(),
            status_code,
            source: None,
        }
    }

    /// Creates a new fetch error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::error::RepixError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
    /// let err = RepixError::fetch_with_source("failed to connect", io_err);
    /// assert!(matches!(err, RepixError::Fetch { .. }));
    /// ```
    pub fn fetch_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Fetch {
            message: message.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new format error.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::error::RepixError;
    ///
    /// let err = RepixError::format("expected an array");
    /// assert!(matches!(err, RepixError::Format { .. }));
    /// ```
    pub fn format<S: Into<String>>(message: S) -> Self {
        Self::Format {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new format error with a source error.
    pub fn format_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Format {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new local I/O error.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::error::RepixError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::Other, "no space left");
    /// let err = RepixError::io("Failed to write preview file", io_err);
    /// assert_eq!(err.to_string(), "Failed to write preview file");
    /// ```
    pub fn io<S: Into<String>>(message: S, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Creates a new configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::error::RepixError;
    ///
    /// let err = RepixError::config("invalid config file", Some("/path/to/config.yaml"));
    /// assert!(matches!(err, RepixError::Config { .. }));
    /// ```
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { status_code, .. } | Self::Api { status_code, .. } => {
                Some(*status_code)
            }
            Self::Fetch { status_code, .. } => *status_code,
            _ => None,
        }
    }
}
