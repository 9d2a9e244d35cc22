//! Interactive session.
//!
//! The shell keeps one [`Session`] alive across commands: a selected file
//! stays staged until it is uploaded, the filename can be changed before
//! saving, and the last listing is what `view`, `edit` and `delete` pick from.

use crate::commands::files::prompt_confirm;
use crate::context::AppContext;
use crate::format;
use librepix::config::OutputFormat;
use librepix::{Confirm, RepixError, RepositoryImageClient, Result, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Commands understood by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Stage a local file for upload
    Select(PathBuf),
    /// Set the filename the staged file is saved under
    Name(String),
    /// Upload the staged file
    Add,
    /// Refresh the listing
    List,
    /// Preview a listed file
    View(String),
    /// Release the current preview
    Close,
    /// Stage a listed file's content for an overwrite
    Edit(String),
    /// Delete a listed file
    Delete(String),
    /// Show the session state
    Status,
    Help,
    Quit,
}

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub const HELP: &str = "\
Commands:
  select <path>    stage a local file for upload
  name <filename>  set the filename to save under
  add              upload the staged file (creates or updates)
  list, refresh    reload the folder listing
  view <name>      download a listed file into the preview
  close            release the preview
  edit <name>      load a listed file for overwriting
  delete <name>    delete a listed file
  status           show the session state
  help             show this help
  quit             leave the shell";

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let argument = |usage: &str| -> std::result::Result<String, String> {
            if rest.is_empty() {
                Err(format!("usage: {}", usage))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "select" => Ok(Self::Select(PathBuf::from(argument("select <path>")?))),
            "name" => Ok(Self::Name(argument("name <filename>")?)),
            "add" | "save" | "upload" => Ok(Self::Add),
            "list" | "ls" | "refresh" => Ok(Self::List),
            "view" => Ok(Self::View(argument("view <name>")?)),
            "close" => Ok(Self::Close),
            "edit" => Ok(Self::Edit(argument("edit <name>")?)),
            "delete" | "rm" => Ok(Self::Delete(argument("delete <name>")?)),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Err(String::new()),
            other => Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
        }
    }
}

/// Runs `command` against the session.
///
/// Status messages stay in the session banner; the caller prints them.
pub async fn execute<C: Confirm>(
    client: &RepositoryImageClient,
    session: &mut Session,
    command: ShellCommand,
    confirm: &mut C,
) -> Result<Flow> {
    match command {
        ShellCommand::Select(path) => client.select_local_file(session, &path).await?,
        ShellCommand::Name(name) => session.set_file_name(name),
        ShellCommand::Add => {
            client.upsert_file(session).await?;
        }
        ShellCommand::List => {
            client.list_files(session).await?;
        }
        ShellCommand::View(name) => {
            let entry = listed(session, &name)?;
            let download_url = entry.download_url.ok_or_else(|| {
                RepixError::validation(format!("'{}' has no download URL", entry.name))
            })?;
            client
                .preview_file(session, &entry.name, &download_url)
                .await?;
        }
        ShellCommand::Close => session.close_preview(),
        ShellCommand::Edit(name) => {
            let entry = listed(session, &name)?;
            client
                .load_for_edit(session, &entry.name, &entry.path)
                .await?;
        }
        ShellCommand::Delete(name) => {
            let entry = listed(session, &name)?;
            client
                .delete_file(session, &entry.name, &entry.path, confirm)
                .await?;
        }
        ShellCommand::Status | ShellCommand::Help => {}
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Looks `name` up in the last listing.
fn listed(session: &Session, name: &str) -> Result<librepix::RemoteFileEntry> {
    session.find_file(name).cloned().ok_or_else(|| {
        RepixError::validation(format!(
            "No file named '{}' in the last listing. Run 'list' first.",
            name
        ))
    })
}

/// Describes the staged file, filename field and preview.
pub fn describe_session(session: &Session) -> String {
    let mut lines = Vec::new();
    match session.credentials() {
        Some(credentials) => lines.push(format!(
            "Repository: {}/{} ({})",
            credentials.owner(),
            credentials.repository(),
            if credentials.folder().is_empty() {
                "/"
            } else {
                credentials.folder()
            }
        )),
        None => lines.push("Repository: (credentials not validated)".to_string()),
    }
    match session.pending() {
        Some(pending) => lines.push(format!("Staged file: {}", pending.display_name())),
        None => lines.push("Staged file: (none)".to_string()),
    }
    lines.push(format!("Filename: {}", session.file_name()));
    match session.preview() {
        Some(preview) => lines.push(format!(
            "Preview: {} ({} bytes) at {}",
            preview.file_name(),
            preview.len(),
            preview.path().display()
        )),
        None => lines.push("Preview: (none)".to_string()),
    }
    lines.join("\n")
}

/// Prints what a command changed: the listing, the preview or the session.
fn render_after(ctx: &AppContext, session: &Session, command: &ShellCommand) {
    match command {
        ShellCommand::List | ShellCommand::Add | ShellCommand::Delete(_) => {
            match format::render_listing(session.listing(), OutputFormat::Pretty) {
                Ok(table) => println!("{}", table),
                Err(e) => ctx.formatter().error(&e),
            }
        }
        ShellCommand::View(_) => {
            if let Some(preview) = session.preview() {
                println!("Preview: {}", preview.path().display());
            }
        }
        ShellCommand::Status => println!("{}", describe_session(session)),
        ShellCommand::Help => println!("{}", HELP),
        _ => {}
    }
}

/// Handle the shell command
pub async fn handle_shell(ctx: &AppContext) {
    let client = match ctx.client() {
        Ok(client) => client,
        Err(e) => {
            ctx.formatter().error(&e);
            std::process::exit(1);
        }
    };
    let mut session = ctx.session();

    println!("repix shell {}. Type 'help' for commands.", env!("CARGO_PKG_VERSION"));
    if client.list_files(&mut session).await.is_ok() {
        render_after(ctx, &session, &ShellCommand::List);
    }
    if let Some(message) = session.status().visible() {
        ctx.formatter().status(message);
    }

    let stdin = io::stdin();
    loop {
        print!("repix> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                ctx.formatter().error(&format!("Failed to read input: {}", e));
                break;
            }
        }

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(e) if e.is_empty() => continue,
            Err(e) => {
                ctx.formatter().warning(&e);
                continue;
            }
        };

        tracing::debug!(?command, "shell command");
        session.status_mut().clear();
        match execute(&client, &mut session, command.clone(), &mut prompt_confirm).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => render_after(ctx, &session, &command),
            // Lookup failures never reach the banner.
            Err(e) if session.status().latest().is_none() => {
                ctx.formatter().error(&e.to_string())
            }
            Err(_) => {}
        }

        if let Some(message) = session.status().visible() {
            ctx.formatter().status(message);
        }
    }
}

#[cfg(test)]
mod tests;
