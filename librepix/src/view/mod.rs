//! View model for directory listings.
//!
//! [`compute_listing_view`] is a pure function from a listing result to what
//! should be shown; renderers (table, JSON, shell) only draw its output.

use crate::client::RemoteFileEntry;
use crate::error::Result;
use serde::Serialize;


/// Placeholder shown for a folder without files.
pub const EMPTY_PLACEHOLDER: &str = "No images found in this folder";

/// Per-row action offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

/// One displayed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub size_label: String,
    pub download_url: Option<String>,
    pub actions: Vec<RowAction>,
}

impl EntryRow {
    fn from_entry(entry: &RemoteFileEntry) -> Self {
        // Without a download URL there is nothing to preview.
        let mut actions = Vec::with_capacity(3);
        if entry.download_url.is_some() {
            actions.push(RowAction::View);
        }
        actions.extend([RowAction::Edit, RowAction::Delete]);

        Self {
            name: entry.name.clone(),
            path: entry.path.clone(),
            size: entry.size,
            size_label: size_label(entry.size),
            download_url: entry.download_url.clone(),
            actions,
        }
    }
}

/// What the listing area shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum ListingView {
    /// Nothing fetched yet, or a fetch is in flight.
    Loading,
    /// The folder was listed and holds no files.
    Empty,
    /// The folder's files.
    Entries(Vec<EntryRow>),
    /// The listing failed with this message.
    Failed(String),
}

impl ListingView {
    /// Rows to draw; empty for every state but [`ListingView::Entries`].
    pub fn rows(&self) -> &[EntryRow] {
        match self {
            Self::Entries(rows) => rows,
            _ => &[],
        }
    }

    /// Text to draw instead of rows.
    pub fn placeholder(&self) -> Option<String> {
        match self {
            Self::Loading => Some("Loading...".to_string()),
            Self::Empty => Some(EMPTY_PLACEHOLDER.to_string()),
            Self::Entries(_) => None,
            Self::Failed(message) => Some(format!("Error: {}", message)),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// File size as shown next to each row, in KiB with two decimals.
///
/// # Examples
///
/// ```
/// use librepix::view::size_label;
///
/// assert_eq!(size_label(2048), "2.00 KB");
/// assert_eq!(size_label(1500), "1.46 KB");
/// ```
pub fn size_label(size: u64) -> String {
    format!("{:.2} KB", size as f64 / 1024.0)
}

/// Computes the listing view from the outcome of a listing request.
pub fn compute_listing_view(listing: &Result<Vec<RemoteFileEntry>>) -> ListingView {
    match listing {
        Err(e) => ListingView::Failed(e.to_string()),
        Ok(entries) if entries.is_empty() => ListingView::Empty,
        Ok(entries) => ListingView::Entries(entries.iter().map(EntryRow::from_entry).collect()),
    }
}
