//! Elastibox CLI - replay recorded host events against an in-memory canvas.
//!
//! A replay script is a JSON array of steps; every `snapshot` step prints
//! the canvas state as JSON.

mod logger;
mod script;

use anyhow::{Context, Result};
use canvas::{CanvasOptions, DeviceId};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use logger::ElastiboxLogger;
use script::{example_script, parse_script, Session};
use std::path::{Path, PathBuf};

/// Elastibox CLI - drive a canvas from a script
#[derive(Parser)]
#[command(name = "elastibox")]
#[command(about = "Replay host events against an Elastibox canvas")]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    /// Also write the log to ~/.elastibox/logs/{run_id}/log
    #[arg(long)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script and print each snapshot
    Replay {
        /// Path to the JSON script
        script: PathBuf,

        /// JSON file with canvas options
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Device id used for entity reference ids (default: random)
        #[arg(short, long)]
        device: Option<String>,
    },

    /// Print a sample script
    Example,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ElastiboxLogger::init(cli.log_level, cli.log_file)?;

    match cli.command {
        Commands::Replay {
            script,
            options,
            device,
        } => replay(&script, options.as_deref(), device),
        Commands::Example => print_example(),
    }
}

fn replay(script: &Path, options: Option<&Path>, device: Option<String>) -> Result<()> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script: {}", script.display()))?;
    let steps = parse_script(&text)?;

    let options = match options {
        Some(path) => load_options(path)?,
        None => CanvasOptions::default(),
    };
    let device = device
        .map(DeviceId::from_string)
        .unwrap_or_else(DeviceId::generate);

    log::info!("Replaying {} steps from {}", steps.len(), script.display());
    let mut session = Session::new(device, options)?;
    for snapshot in session.run(&steps)? {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}

fn load_options(path: &Path) -> Result<CanvasOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options: {}", path.display()))?;
    CanvasOptions::from_json(&text)
        .with_context(|| format!("Invalid canvas options in {}", path.display()))
}

fn print_example() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&example_script())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_replay_arguments() {
        let cli = Cli::try_parse_from([
            "elastibox",
            "--log-level",
            "debug",
            "replay",
            "board.json",
            "--device",
            "laptop",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LevelFilter::Debug);
        assert!(!cli.log_file);
        match cli.command {
            Commands::Replay {
                script,
                options,
                device,
            } => {
                assert_eq!(script, PathBuf::from("board.json"));
                assert!(options.is_none());
                assert_eq!(device.as_deref(), Some("laptop"));
            }
            Commands::Example => panic!("expected replay"),
        }
    }

    #[test]
    fn example_script_parses_back() {
        let json = serde_json::to_string(&example_script()).unwrap();
        assert_eq!(parse_script(&json).unwrap().len(), example_script().len());
    }
}
