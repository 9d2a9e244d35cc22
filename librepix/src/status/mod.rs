//! Ephemeral status messages.
//!
//! The banner keeps only the most recent message. A message is visible until
//! its time-to-live runs out; readers pass the instant they render at.

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};


/// How long a message stays visible by default.
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(5);

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

impl StatusLevel {
    fn marker(self) -> &'static str {
        match self {
            Self::Info => "⏳",
            Self::Success => "✓",
            Self::Error => "❌",
        }
    }
}

/// A message posted to the banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub posted_at: Instant,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.marker(), self.text)
    }
}

/// Holds the latest status message and its expiry.
#[derive(Debug, Clone)]
pub struct StatusBanner {
    ttl: Duration,
    current: Option<StatusMessage>,
}

impl Default for StatusBanner {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_TTL)
    }
}

impl StatusBanner {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replaces the current message.
    pub fn post(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.post_at(level, text, Instant::now());
    }

    /// Replaces the current message, stamping it with `now`.
    pub fn post_at(&mut self, level: StatusLevel, text: impl Into<String>, now: Instant) {
        let text = text.into();
        tracing::trace!(?level, %text, "status");
        self.current = Some(StatusMessage {
            text,
            level,
            posted_at: now,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.post(StatusLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.post(StatusLevel::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.post(StatusLevel::Error, text);
    }

    /// The message visible at `now`, if it has not expired.
    ///
    /// # Examples
    ///
    /// ```
    /// use librepix::status::StatusBanner;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut banner = StatusBanner::new(Duration::from_secs(5));
    /// let posted = Instant::now();
    /// banner.post_at(librepix::status::StatusLevel::Success, "saved", posted);
    ///
    /// assert!(banner.visible_at(posted + Duration::from_secs(4)).is_some());
    /// assert!(banner.visible_at(posted + Duration::from_secs(5)).is_none());
    /// ```
    pub fn visible_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.current
            .as_ref()
            .filter(|message| now.saturating_duration_since(message.posted_at) < self.ttl)
    }

    /// The message visible right now.
    pub fn visible(&self) -> Option<&StatusMessage> {
        self.visible_at(Instant::now())
    }

    /// The most recent message regardless of expiry.
    pub fn latest(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
