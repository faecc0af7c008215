//! CLI module for LifeLink
//!
//! Command-line interface definitions and handlers for the dispatch simulator.
//!
//! # Commands
//!
//! - `patient` - Play the patient SOS flow through arrival
//! - `driver` - Sign in and play one case through hospital handoff
//! - `board` - Show the hospital or control center board
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Trigger an SOS and close the request once the unit arrives
//! lifelink patient --close
//!
//! # Drive a case end to end, pausing 2s between controls
//! lifelink driver --driver-id DRV001 --password password123 --step-ms 2000
//!
//! # Generate shell completions
//! lifelink completions bash > ~/.bash_completion.d/lifelink
//! ```

pub mod board;
pub mod completions;
pub mod config;
pub mod driver;
pub mod output;
pub mod patient;
pub mod setup;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::dispatch::DriverStatus;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// LifeLink - emergency dispatch simulator
#[derive(Parser, Debug)]
#[command(
    name = "lifelink",
    version,
    about = "Simulated ambulance dispatch for patients, drivers and hospitals"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trigger an SOS and follow the dispatch timeline
    Patient(PatientArgs),
    /// Sign in as a driver and work one case
    Driver(DriverArgs),
    /// Show a read-only board
    #[command(subcommand)]
    Board(BoardCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct PatientArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "lifelink.toml")]
    pub config: PathBuf,

    /// Close the request once the unit has arrived
    #[arg(long)]
    pub close: bool,

    /// Output events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LIFELINK_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct DriverArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "lifelink.toml")]
    pub config: PathBuf,

    /// Driver ID to sign in with
    #[arg(long)]
    pub driver_id: String,

    /// Password to sign in with
    #[arg(long)]
    pub password: String,

    /// Pause between status controls in milliseconds
    #[arg(long, default_value = "3000")]
    pub step_ms: u64,

    /// Public map access token; enables live tiles
    #[arg(long, env = "LIFELINK_MAP_TOKEN")]
    pub map_token: Option<String>,

    /// Output events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LIFELINK_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Bed capacity and incoming patients
    Hospital(HospitalArgs),
    /// Fleet status, incident zones and key metrics
    Fleet(FleetArgs),
}

#[derive(Args, Debug)]
pub struct HospitalArgs {
    /// Adjust available beds before display, as WARD_INDEX:DELTA (e.g. 0:+2)
    #[arg(long, value_parser = parse_adjustment, allow_hyphen_values = true)]
    pub adjust: Vec<(usize, i64)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FleetArgs {
    /// Record a unit status before display, as UNIT:STATUS[:ETA] (e.g. C-1:dispatched:7)
    #[arg(long = "set", value_parser = parse_unit_update)]
    pub updates: Vec<UnitUpdate>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "lifelink.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// A status report for one fleet unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitUpdate {
    pub unit_id: String,
    pub status: DriverStatus,
    pub eta_minutes: Option<u32>,
}

fn parse_unit_update(s: &str) -> Result<UnitUpdate, String> {
    let mut parts = s.splitn(3, ':');
    let unit_id = parts.next().unwrap_or_default().trim();
    if unit_id.is_empty() {
        return Err(format!("Expected UNIT:STATUS[:ETA], got '{}'", s));
    }
    let status: DriverStatus = parts
        .next()
        .ok_or_else(|| format!("Expected UNIT:STATUS[:ETA], got '{}'", s))?
        .trim()
        .parse()?;
    let eta_minutes = parts
        .next()
        .map(|eta| {
            eta.trim()
                .parse()
                .map_err(|_| format!("Invalid ETA minutes: {}", eta))
        })
        .transpose()?;
    Ok(UnitUpdate {
        unit_id: unit_id.to_string(),
        status,
        eta_minutes,
    })
}

fn parse_adjustment(s: &str) -> Result<(usize, i64), String> {
    let (index, delta) = s
        .split_once(':')
        .ok_or_else(|| format!("Expected WARD_INDEX:DELTA, got '{}'", s))?;
    let index = index
        .trim()
        .parse()
        .map_err(|_| format!("Invalid ward index: {}", index))?;
    let delta = delta
        .trim()
        .trim_start_matches('+')
        .parse()
        .map_err(|_| format!("Invalid bed delta: {}", delta))?;
    Ok((index, delta))
}
