use indicatif::{ProgressBar, ProgressStyle};
pub use librepix::config::{ColorChoice, OutputFormat};
use librepix::view::{ListingView, RowAction};
use librepix::{StatusLevel, StatusMessage};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use tabled::Tabled;

/// Trait for output formatting that can be TTY-aware or plain text
pub trait OutputFormatter {
    /// Print a success message
    fn success(&self, message: &str);

    /// Print an error message
    fn error(&self, message: &str);

    /// Print a warning message
    fn warning(&self, message: &str);

    /// Print an in-progress message
    fn info(&self, message: &str);

    /// Create a spinner for indeterminate progress
    fn spinner(&self, message: &str) -> ProgressBar;

    /// Print a session status message with its level's styling
    fn status(&self, message: &StatusMessage) {
        match message.level {
            StatusLevel::Info => self.info(&message.text),
            StatusLevel::Success => self.success(&message.text),
            StatusLevel::Error => self.error(&message.text),
        }
    }
}

/// TTY-aware formatter with colors and progress indicators
pub struct TtyFormatter;

impl OutputFormatter for TtyFormatter {
    fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "❌".red().bold(), message);
    }

    fn warning(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message);
    }

    fn info(&self, message: &str) {
        println!("{} {}", "⏳".cyan(), message);
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner
    }
}

/// Plain text formatter for non-TTY output (piped, scripted)
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn success(&self, message: &str) {
        println!("✓ {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    fn warning(&self, message: &str) {
        println!("⚠ {}", message);
    }

    fn info(&self, message: &str) {
        println!("⏳ {}", message);
    }

    fn spinner(&self, _message: &str) -> ProgressBar {
        ProgressBar::hidden()
    }
}

/// Create the appropriate formatter for the color choice and terminal
pub fn create_formatter(color: ColorChoice) -> Box<dyn OutputFormatter> {
    match color {
        ColorChoice::Always => Box::new(TtyFormatter),
        ColorChoice::Never => Box::new(PlainFormatter),
        ColorChoice::Auto => {
            if std::env::var("NO_COLOR").is_ok() {
                return Box::new(PlainFormatter);
            }
            // Check if stdout OR stderr is a terminal (since we output to both)
            if std::io::stdout().is_terminal() || std::io::stderr().is_terminal() {
                Box::new(TtyFormatter)
            } else {
                Box::new(PlainFormatter)
            }
        }
    }
}

/// Parses an output format name; anything unknown is pretty.
pub fn parse_output_format(s: &str) -> OutputFormat {
    match s.to_lowercase().as_str() {
        "json" => OutputFormat::Json,
        "yaml" | "yml" => OutputFormat::Yaml,
        _ => OutputFormat::Pretty,
    }
}

/// Parses a color choice; anything unknown is auto.
pub fn parse_color_choice(s: &str) -> ColorChoice {
    match s.to_lowercase().as_str() {
        "always" => ColorChoice::Always,
        "never" => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Trait for types that can be formatted for CLI output
pub trait Formattable: Serialize {
    /// Format the type for pretty (human-readable) output
    fn format_pretty(&self) -> String;
}

/// Format a single item for output
pub fn format_output<T: Formattable>(item: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Pretty => Ok(item.format_pretty()),
        _ => serialize(item, format),
    }
}

fn serialize<T: Serialize + ?Sized>(item: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(item).map_err(|e| format!("Failed to serialize to YAML: {}", e))
        }
        _ => serde_json::to_string_pretty(item)
            .map_err(|e| format!("Failed to serialize to JSON: {}", e)),
    }
}

/// One line of the listing table.
#[derive(Debug, Tabled)]
pub struct ListingRow {
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "SIZE")]
    pub size: String,
    #[tabled(rename = "ACTIONS")]
    pub actions: String,
}

fn action_label(action: RowAction) -> &'static str {
    match action {
        RowAction::View => "view",
        RowAction::Edit => "edit",
        RowAction::Delete => "delete",
    }
}

/// Renders a listing view.
///
/// Pretty output is a table, or the view's placeholder when there are no
/// rows. JSON and YAML output the rows themselves.
pub fn render_listing(view: &ListingView, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Pretty => {
            if let Some(placeholder) = view.placeholder() {
                return Ok(placeholder);
            }
            use tabled::{Table, settings::Style};
            let rows: Vec<ListingRow> = view
                .rows()
                .iter()
                .map(|row| ListingRow {
                    name: row.name.clone(),
                    size: row.size_label.clone(),
                    actions: row
                        .actions
                        .iter()
                        .map(|a| action_label(*a))
                        .collect::<Vec<_>>()
                        .join(" "),
                })
                .collect();
            Ok(Table::new(&rows).with(Style::empty()).to_string())
        }
        _ => serialize(view.rows(), format),
    }
}
