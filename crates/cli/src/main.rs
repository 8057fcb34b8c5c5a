//! appstate CLI - inspect and edit persisted application state

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod util;

/// appstate - debounced, crash-safe application state
#[derive(Parser)]
#[command(name = "appstate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// State directory (default: <config dir>/appstate)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Configuration file (default: <state dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every attribute with its current value
    List,
    /// Print one attribute's value as JSON
    Get {
        /// Attribute name or storage key
        name: String,
    },
    /// Set an attribute
    Set {
        /// Attribute name or storage key
        name: String,
        /// JSON value (bare words are taken as strings)
        value: String,
    },
    /// Restore an attribute to its default
    Reset {
        /// Attribute name or storage key
        name: String,
    },
    /// Print the state file path
    Path,
    /// Inspect store configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print an example configuration file
    Example,
    /// Write the default configuration if none exists
    Init,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = util::Paths::resolve(cli.state_dir, cli.config)?;

    match cli.command {
        Commands::List => cmd::list::run(&paths),
        Commands::Get { name } => cmd::get::run(&paths, &name),
        Commands::Set { name, value } => cmd::set::run(&paths, &name, &value),
        Commands::Reset { name } => cmd::set::run_reset(&paths, &name),
        Commands::Path => cmd::path::run(&paths),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => cmd::config::run_show(&paths),
            ConfigCommands::Example => cmd::config::run_example(),
            ConfigCommands::Init => cmd::config::run_init(&paths),
        },
    }
}
