//! Board command implementation

use crate::board::{ControlCenter, HospitalBoard};
use crate::cli::output::{
    format_fleet_json, format_fleet_tables, format_hospital_json, format_hospital_tables,
    format_notification,
};
use crate::cli::{BoardCommands, FleetArgs, HospitalArgs};

/// Handle `lifelink board` commands
pub fn handle_board(cmd: &BoardCommands) -> Result<String, Box<dyn std::error::Error>> {
    match cmd {
        BoardCommands::Hospital(args) => handle_hospital(args),
        BoardCommands::Fleet(args) => handle_fleet(args),
    }
}

fn handle_hospital(args: &HospitalArgs) -> Result<String, Box<dyn std::error::Error>> {
    let mut board = HospitalBoard::demo();

    let mut notices = Vec::new();
    for &(index, delta) in &args.adjust {
        let notification = board.adjust(index, delta)?;
        notices.push(format_notification(&notification));
    }

    if args.json {
        return Ok(format_hospital_json(&board)?);
    }

    let tables = format_hospital_tables(&board);
    if notices.is_empty() {
        Ok(tables)
    } else {
        Ok(format!("{}\n\n{}", notices.join("\n"), tables))
    }
}

fn handle_fleet(args: &FleetArgs) -> Result<String, Box<dyn std::error::Error>> {
    let center = ControlCenter::demo();
    for update in &args.updates {
        center
            .fleet()
            .update_status(&update.unit_id, update.status, update.eta_minutes)?;
    }

    if args.json {
        Ok(format_fleet_json(&center)?)
    } else {
        Ok(format_fleet_tables(&center))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardError;
    use crate::cli::UnitUpdate;
    use crate::dispatch::DriverStatus;
    use clap::Parser;

    #[test]
    fn test_hospital_adjust_applied_before_display() {
        let args = HospitalArgs {
            adjust: vec![(0, 2)],
            json: true,
        };
        let output = handle_board(&BoardCommands::Hospital(args)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["beds"][0]["available"], 5);
    }

    #[test]
    fn test_hospital_adjust_unknown_ward() {
        let args = HospitalArgs {
            adjust: vec![(7, 1)],
            json: false,
        };
        let err = handle_board(&BoardCommands::Hospital(args)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BoardError>(),
            Some(&BoardError::UnknownWard(7))
        );
    }

    #[test]
    fn test_hospital_text_includes_notice() {
        let args = HospitalArgs {
            adjust: vec![(1, -1)],
            json: false,
        };
        let output = handle_board(&BoardCommands::Hospital(args)).unwrap();
        assert!(output.contains("Emergency beds updated."));
    }

    #[test]
    fn test_hospital_adjust_full_i64_range() {
        let cli = crate::cli::Cli::try_parse_from([
            "lifelink",
            "board",
            "hospital",
            "--adjust",
            "0:9223372036854775807",
            "--adjust",
            "1:-9223372036854775808",
            "--json",
        ])
        .unwrap();
        let crate::cli::Commands::Board(cmd) = cli.command else {
            panic!("Expected Board command");
        };

        let output = handle_board(&cmd).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["beds"][0]["available"], 12);
        assert_eq!(parsed["beds"][1]["available"], 0);
    }

    #[test]
    fn test_fleet_updates_applied_before_display() {
        let args = FleetArgs {
            updates: vec![UnitUpdate {
                unit_id: "C-1".to_string(),
                status: DriverStatus::Dispatched,
                eta_minutes: Some(7),
            }],
            json: true,
        };
        let output = handle_board(&BoardCommands::Fleet(args)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["metrics"][1]["value"], "5/6");

        let c1 = parsed["units"]
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["id"] == "C-1")
            .unwrap();
        assert_eq!(c1["status"], "dispatched");
        assert_eq!(c1["eta_minutes"], 7);
    }

    #[test]
    fn test_fleet_unknown_unit() {
        let args = FleetArgs {
            updates: vec![UnitUpdate {
                unit_id: "Q-9".to_string(),
                status: DriverStatus::EnRoute,
                eta_minutes: None,
            }],
            json: false,
        };
        let err = handle_board(&BoardCommands::Fleet(args)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BoardError>(),
            Some(&BoardError::UnknownUnit("Q-9".to_string()))
        );
    }

    #[test]
    fn test_fleet_text() {
        let args = FleetArgs {
            updates: Vec::new(),
            json: false,
        };
        let output = handle_board(&BoardCommands::Fleet(args)).unwrap();
        assert!(output.contains("Active Ambulances"));
    }
}
