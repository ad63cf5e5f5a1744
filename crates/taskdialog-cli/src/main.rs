//! TaskDialog CLI - validate dialog configurations and replay scripted sessions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use taskdialog_core::{headless::HeadlessBackend, DialogConfig, TaskDialog};

mod logging;
mod session;

use logging::{parse_log_level, setup_logging, LoggingConfig};
use session::{is_json, SessionDriver, SessionFile};

#[derive(Parser, Debug)]
#[command(name = "taskdialog")]
#[command(version, about = "Task dialog configuration and session tool", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a session file and print its events and final result
    Run {
        /// Session file (TOML, or JSON with a .json extension)
        session_file: PathBuf,
    },

    /// Construct a single dialog configuration and report what it sets
    Check {
        /// Dialog configuration file (TOML, or JSON with a .json extension)
        dialog_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = parse_log_level(&cli.log_level)?;
    setup_logging(LoggingConfig::new(level).with_json(cli.json))?;
    info!("Starting taskdialog v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run { session_file } => run_session(session_file).await,
        Commands::Check { dialog_file } => check_dialog(dialog_file).await,
    }
}

async fn run_session(path: PathBuf) -> Result<()> {
    let file = SessionFile::load(&path).await?;
    let transcript = SessionDriver::new(file)?.run()?;

    for event in &transcript.events {
        println!("{}", serde_json::to_string(event)?);
    }
    println!("{}", serde_json::to_string(&transcript.result)?);
    Ok(())
}

async fn check_dialog(path: PathBuf) -> Result<()> {
    let input = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = if is_json(&path) {
        DialogConfig::from_json_str(&input)
    } else {
        DialogConfig::from_toml_str(&input)
    }
    .with_context(|| format!("Failed to parse {}", path.display()))?;

    let backend = HeadlessBackend::new();
    let dialog = TaskDialog::with_config(&backend, config)
        .with_context(|| format!("Invalid dialog configuration in {}", path.display()))?;

    for attribute in taskdialog_core::Attribute::ALL {
        if let Some(value) = dialog.get(attribute) {
            println!("{} = {}", attribute, serde_json::to_string(&value)?);
        }
    }
    println!("Buttons: {}", dialog.buttons().len());
    println!("RadioButtons: {}", dialog.radio_buttons().len());
    Ok(())
}
