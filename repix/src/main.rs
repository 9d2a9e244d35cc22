use clap::{CommandFactory, Parser, Subcommand};
use librepix::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod format;

/// Repix - GitHub Repository Image Manager
///
/// A CLI tool for listing, previewing, uploading and deleting images stored in
/// a folder of a GitHub repository.
#[derive(Parser, Debug)]
#[command(name = "repix")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    /// Path to the config file (defaults to ~/.config/repix/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GitHub access token
    #[arg(long, global = true, env = "REPIX_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Repository owner (overrides github.owner)
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Repository name (overrides github.repository)
    #[arg(long = "repo", global = true)]
    repository: Option<String>,

    /// Folder inside the repository (overrides github.folder)
    #[arg(long, global = true)]
    folder: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display version information
    Version,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// List the images in the folder
    #[command(visible_alias = "ls")]
    List {
        /// Output format: pretty, json, yaml
        #[arg(short, long)]
        format: Option<String>,
        /// Show only file names
        #[arg(short, long)]
        quiet: bool,
    },
    /// Upload a local image, creating or updating the remote file
    Upload {
        /// Local file to upload
        file: PathBuf,
        /// Name to save the file under (defaults to the local file name)
        #[arg(short, long)]
        name: Option<String>,
        /// Output format: pretty, json, yaml
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Download a listed image
    View {
        /// File name as listed
        name: String,
        /// Where to write the image (defaults to ./<name>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a listed image
    #[command(visible_alias = "rm")]
    Delete {
        /// File name as listed
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Start an interactive session
    Shell,
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Display the effective configuration
    Show {
        /// Output format: pretty, json, yaml
        #[arg(short, long)]
        format: Option<String>,
    },
}

/// Installs the stderr log subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: context::VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let verbosity = context::VerbosityLevel::from_count(cli.verbose);
    init_tracing(verbosity);

    let color = cli.color.as_deref().map(format::parse_color_choice);

    // Commands that need no configuration
    match &cli.command {
        Commands::Version => {
            commands::version::print_version();
            return;
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            return;
        }
        Commands::Config {
            command: ConfigCommands::Init { force },
        } => {
            // The file may not exist yet, so it is not loaded.
            let ctx = context::AppContext::from_config(
                Config::default(),
                color,
                verbosity,
                context::CredentialArgs::default(),
            );
            commands::config::handle_init(&ctx, cli.config.as_deref(), *force);
            return;
        }
        _ => {}
    }

    // Build context with precedence: defaults > config file > env vars > CLI flags
    let credentials = context::CredentialArgs {
        token: cli.token,
        owner: cli.owner,
        repository: cli.repository,
        folder: cli.folder,
    };
    let ctx = match context::AppContext::build(
        cli.config.as_deref(),
        color,
        verbosity,
        credentials,
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Init { .. } => {}
            ConfigCommands::Show { format } => {
                let fmt = ctx.output_format(format.as_deref());
                commands::config::handle_show(&ctx, fmt);
            }
        },
        Commands::List { format, quiet } => {
            let fmt = ctx.output_format(format.as_deref());
            commands::files::handlers::handle_list(&ctx, fmt, quiet).await;
        }
        Commands::Upload { file, name, format } => {
            let fmt = ctx.output_format(format.as_deref());
            commands::files::handlers::handle_upload(&ctx, &file, name.as_deref(), fmt).await;
        }
        Commands::View { name, output } => {
            commands::files::handlers::handle_view(&ctx, &name, output.as_deref()).await;
        }
        Commands::Delete { name, force } => {
            commands::files::handlers::handle_delete(&ctx, &name, force).await;
        }
        Commands::Shell => commands::shell::handle_shell(&ctx).await,
        Commands::Version | Commands::Completion { .. } => {}
    }
}
