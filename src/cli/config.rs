//! Config command handlers

use crate::cli::ConfigInitArgs;
use crate::config::LifelinkConfig;
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../lifelink.example.toml");

/// Handle `lifelink config init` command
///
/// Writes the example config, reloads it through the normal loader and
/// prints what a session started from it would do.
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    let config = LifelinkConfig::load(Some(&args.output))?;
    config.validate()?;

    println!("✓ Configuration file created: {}", args.output.display());
    println!("  {}", describe_config(&config));

    Ok(())
}

/// One-line summary of the dispatch timeline and map mode.
pub fn describe_config(config: &LifelinkConfig) -> String {
    let dispatch = &config.dispatch;
    let map = if config
        .map
        .access_token
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty())
    {
        "live tiles"
    } else {
        "synthetic tiles"
    };

    format!(
        "Unit {} en route at {}, ETA update at {}, arrival at {}; {} ms ticks; {}",
        dispatch.unit_id,
        seconds(dispatch.en_route_after_ms),
        seconds(dispatch.eta_update_after_ms),
        seconds(dispatch.arrival_after_ms),
        config.simulation.tick_interval_ms,
        map
    )
}

fn seconds(ms: u64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}
