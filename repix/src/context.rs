//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use crate::format::{self, OutputFormatter};
use librepix::config::{ColorChoice, Config, OutputFormat};
use librepix::{CredentialForm, RepositoryImageClient, Session};
use std::io::IsTerminal;
use std::path::Path;

/// How much the CLI reports about what it is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    Normal,
    Verbose,
    VeryVerbose,
    Trace,
}

impl VerbosityLevel {
    /// Maps the number of `-v` flags to a level.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::VeryVerbose,
            _ => Self::Trace,
        }
    }

    /// Log filter used when `RUST_LOG` is unset.
    pub fn log_directive(self) -> &'static str {
        match self {
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::VeryVerbose => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Repository coordinates and token given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CredentialArgs {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repository: Option<String>,
    pub folder: Option<String>,
}

/// Application context with resolved configuration and runtime state
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
    pub verbosity: VerbosityLevel,
    credentials: CredentialArgs,
    formatter: Box<dyn OutputFormatter>,
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars > CLI flags
    pub fn build(
        config_path: Option<&Path>,
        cli_color: Option<ColorChoice>,
        verbosity: VerbosityLevel,
        credentials: CredentialArgs,
    ) -> Result<Self, String> {
        let config = Config::load(config_path).map_err(|e| e.to_string())?;
        Ok(Self::from_config(config, cli_color, verbosity, credentials))
    }

    /// Builds a context around an already loaded configuration.
    pub fn from_config(
        mut config: Config,
        cli_color: Option<ColorChoice>,
        verbosity: VerbosityLevel,
        credentials: CredentialArgs,
    ) -> Self {
        if let Some(color) = cli_color {
            config.output.color = color;
        }
        let formatter = format::create_formatter(config.output.color);

        Self {
            config,
            verbosity,
            credentials,
            formatter,
        }
    }

    pub fn formatter(&self) -> &dyn OutputFormatter {
        self.formatter.as_ref()
    }

    /// Prints `message` to stderr when running at `level` or above.
    pub fn print(&self, level: VerbosityLevel, message: &str) {
        if self.verbosity >= level {
            eprintln!("{}", message);
        }
    }

    /// The `--format` flag if given, otherwise the configured format.
    pub fn output_format(&self, flag: Option<&str>) -> OutputFormat {
        flag.map(format::parse_output_format)
            .unwrap_or(self.config.output.format)
    }

    /// Builds the client from the resolved configuration.
    pub fn client(&self) -> Result<RepositoryImageClient, String> {
        RepositoryImageClient::builder()
            .with_config(&self.config)
            .build()
            .map_err(|e| e.to_string())
    }

    /// Collects credential inputs: flags first, then environment, then config.
    ///
    /// A missing token is prompted for when stdin is a terminal.
    pub fn credential_form(&self) -> CredentialForm {
        let github = &self.config.github;
        let token = pick_token(
            self.credentials.token.as_deref(),
            std::env::var("GITHUB_TOKEN").ok(),
        )
        .or_else(prompt_token)
        .unwrap_or_default();

        CredentialForm::new(
            token,
            self.credentials
                .owner
                .clone()
                .unwrap_or_else(|| github.owner.clone()),
            self.credentials
                .repository
                .clone()
                .unwrap_or_else(|| github.repository.clone()),
            self.credentials
                .folder
                .clone()
                .unwrap_or_else(|| github.folder.clone()),
        )
    }

    /// Starts a session with the resolved credentials and status TTL.
    pub fn session(&self) -> Session {
        Session::new(self.credential_form()).with_status_ttl(self.config.session.status_ttl())
    }
}

/// First non-blank token among the flag (or `REPIX_TOKEN`) and `GITHUB_TOKEN`.
pub(crate) fn pick_token(flag: Option<&str>, github_env: Option<String>) -> Option<String> {
    flag.map(str::to_string)
        .into_iter()
        .chain(github_env)
        .find(|token| !token.trim().is_empty())
}

fn prompt_token() -> Option<String> {
    if !std::io::stdin().is_terminal() {
        return None;
    }
    match rpassword::prompt_password("GitHub token: ") {
        Ok(token) if !token.trim().is_empty() => Some(token),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read token");
            None
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
