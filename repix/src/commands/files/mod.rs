//! One-shot file commands: list, upload, view, delete.
//!
//! The functions here run one operation against a fresh session and return
//! the library result; [`handlers`] turns those results into output and exit
//! codes.

use crate::format::Formattable;
use librepix::{
    Confirm, DeleteOutcome, RemoteFileEntry, RepixError, RepositoryImageClient, Result, Session,
    UpsertReport,
};
use std::path::{Path, PathBuf};

pub mod handlers;

impl Formattable for UpsertReport {
    fn format_pretty(&self) -> String {
        format!(
            "Image {} successfully: {} ({})",
            self.action.past_tense(),
            self.file_name,
            self.path
        )
    }
}

/// Lists the folder, then looks `name` up in the fresh listing.
pub(crate) async fn find_listed(
    client: &RepositoryImageClient,
    session: &mut Session,
    name: &str,
) -> Result<RemoteFileEntry> {
    client.list_files(session).await?;
    session.find_file(name).cloned().ok_or_else(|| {
        RepixError::validation(format!("No file named '{}' in this folder", name))
    })
}

/// Stages a local file and writes it, optionally under another name.
pub(crate) async fn upload(
    client: &RepositoryImageClient,
    session: &mut Session,
    file: &Path,
    name: Option<&str>,
) -> Result<UpsertReport> {
    client.select_local_file(session, file).await?;
    if let Some(name) = name {
        session.set_file_name(name);
    }
    client.upsert_file(session).await
}

/// Downloads a listed file and copies it to `output`, or `./{name}`.
pub(crate) async fn view(
    client: &RepositoryImageClient,
    session: &mut Session,
    name: &str,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let entry = find_listed(client, session, name).await?;
    let download_url = entry.download_url.ok_or_else(|| {
        RepixError::validation(format!("'{}' has no download URL", entry.name))
    })?;

    let preview = client
        .preview_file(session, &entry.name, &download_url)
        .await?;
    let destination = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&entry.name));
    preview.save_to(&destination)
}

/// Deletes a listed file after `confirm` agrees.
pub(crate) async fn delete<C: Confirm>(
    client: &RepositoryImageClient,
    session: &mut Session,
    name: &str,
    confirm: &mut C,
) -> Result<DeleteOutcome> {
    let entry = find_listed(client, session, name).await?;
    client
        .delete_file(session, &entry.name, &entry.path, confirm)
        .await
}

/// Asks on stdin; anything but `y` declines.
pub(crate) fn prompt_confirm(prompt: &str) -> bool {
    use std::io::{self, Write};

    print!("{} [y/N]: ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(_) => input.trim().eq_ignore_ascii_case("y"),
        Err(_) => false,
    }
}
