//! Output formatting helpers for CLI commands

use crate::board::{CapacityLevel, ControlCenter, HospitalBoard, RiskLevel};
use crate::dispatch::{
    DriverStatus, Notification, PatientStatus, Priority, StatusTone, PROGRESS_STEPS,
};
use crate::session::{DriverSnapshot, PatientSnapshot};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;

/// Writes session events to stdout, as text or one JSON object per line.
#[derive(Debug, Clone, Copy)]
pub struct EventPrinter {
    json: bool,
}

impl EventPrinter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn notification(&self, notification: &Notification) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", format_event_json("notification", notification)?);
        } else {
            println!("{}", format_notification(notification));
        }
        Ok(())
    }

    pub fn patient(&self, snapshot: &PatientSnapshot) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", format_event_json("patient", snapshot)?);
        } else {
            println!("{}", format_patient_snapshot(snapshot));
        }
        Ok(())
    }

    pub fn driver(&self, snapshot: &DriverSnapshot) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", format_event_json("driver", snapshot)?);
        } else {
            println!("{}", format_driver_snapshot(snapshot));
        }
        Ok(())
    }
}

/// One event as a single-line JSON object.
pub fn format_event_json<T: Serialize>(event: &str, data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&json!({
        "event": event,
        "data": data,
    }))
}

pub fn format_notification(notification: &Notification) -> String {
    format!(
        "{} {} {}",
        "»".cyan(),
        format!("{}:", notification.title).bold(),
        notification.description
    )
}

pub fn format_patient_snapshot(snapshot: &PatientSnapshot) -> String {
    let status = match snapshot.status {
        PatientStatus::Idle => "idle".dimmed().to_string(),
        PatientStatus::Dispatching => "dispatching".yellow().to_string(),
        PatientStatus::OnWay => "onway".yellow().bold().to_string(),
        PatientStatus::Arrived => "arrived".green().bold().to_string(),
    };

    let mut line = format!("[{}] unit {}", status, snapshot.unit_id);
    if let Some(eta) = snapshot.eta_minutes {
        line.push_str(&format!("  ETA {} min", eta));
    }
    if let Some(step) = snapshot.progress {
        line.push_str(&format!(
            "  {} {}",
            progress_bar(step + 1, PROGRESS_STEPS.len()),
            PROGRESS_STEPS[step.min(PROGRESS_STEPS.len() - 1)]
        ));
    }
    line
}

pub fn format_driver_snapshot(snapshot: &DriverSnapshot) -> String {
    let mut line = format!(
        "[{}] {} {}",
        driver_status_text(snapshot.status),
        snapshot.unit_id,
        snapshot.driver_name
    );

    if let Some(case) = &snapshot.case {
        line.push_str(&format!(
            "  case {} ({})  ETA {} min",
            case.id,
            priority_text(case.priority),
            case.eta_minutes
        ));
    }
    line.push_str(&format!("  at {}", snapshot.position));
    if snapshot.map.is_live() {
        line.push_str("  map live");
    }
    line
}

fn progress_bar(done: usize, total: usize) -> String {
    let filled = done.min(total);
    format!("{}{}", "#".repeat(filled).green(), "-".repeat(total - filled))
}

pub fn driver_status_text(status: DriverStatus) -> String {
    let label = status.to_string();
    match status.tone() {
        StatusTone::Ok => label.green().to_string(),
        StatusTone::Warning => label.yellow().to_string(),
        StatusTone::Critical => label.red().to_string(),
    }
}

pub fn priority_text(priority: Priority) -> String {
    let label = priority.to_string();
    match priority {
        Priority::Critical => label.red().bold().to_string(),
        Priority::Urgent => label.yellow().to_string(),
        Priority::Standard => label.normal().to_string(),
    }
}

fn capacity_text(level: CapacityLevel) -> String {
    let label = level.to_string();
    match level {
        CapacityLevel::Ok => label.green().to_string(),
        CapacityLevel::Warning => label.yellow().to_string(),
        CapacityLevel::Critical => label.red().to_string(),
    }
}

fn risk_text(risk: RiskLevel) -> String {
    let label = risk.to_string();
    match risk {
        RiskLevel::Low => label.green().to_string(),
        RiskLevel::Medium => label.yellow().to_string(),
        RiskLevel::High => label.red().to_string(),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Format the hospital board as bed and incoming-patient tables
pub fn format_hospital_tables(board: &HospitalBoard) -> String {
    let mut beds = new_table(vec!["Ward", "Available", "Total", "Occupancy", "Level"]);
    for b in board.beds() {
        beds.add_row(vec![
            Cell::new(&b.bed_type),
            Cell::new(b.available),
            Cell::new(b.total),
            Cell::new(format!("{:.0}%", b.occupancy_percent())),
            Cell::new(capacity_text(b.level())),
        ]);
    }

    let mut incoming = new_table(vec![
        "Case", "Priority", "Condition", "Unit", "ETA", "HR", "BP", "Temp",
    ]);
    for p in board.incoming_by_priority() {
        incoming.add_row(vec![
            Cell::new(&p.id),
            Cell::new(priority_text(p.priority)),
            Cell::new(&p.condition),
            Cell::new(&p.unit_id),
            Cell::new(format!("{} min", p.eta_minutes)),
            Cell::new(p.vitals.heart_rate),
            Cell::new(&p.vitals.blood_pressure),
            Cell::new(format!("{:.1}°C", p.vitals.temperature_c)),
        ]);
    }

    format!(
        "{} ({} beds available)\n{}\n\n{}\n{}",
        board.name().bold(),
        board.total_available(),
        beds,
        "Incoming patients".bold(),
        incoming
    )
}

/// Format the hospital board as JSON
pub fn format_hospital_json(board: &HospitalBoard) -> Result<String, serde_json::Error> {
    let beds: Vec<_> = board
        .beds()
        .iter()
        .map(|b| {
            json!({
                "bed_type": b.bed_type,
                "available": b.available,
                "total": b.total,
                "occupancy_percent": b.occupancy_percent(),
                "level": b.level(),
            })
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "hospital": board.name(),
        "total_available": board.total_available(),
        "beds": beds,
        "incoming": board.incoming_by_priority(),
    }))
}

/// Format the control center as metric, unit and zone tables
pub fn format_fleet_tables(center: &ControlCenter) -> String {
    let mut metrics = new_table(vec!["Metric", "Value", "Change"]);
    for m in center.key_metrics() {
        metrics.add_row(vec![
            Cell::new(&m.label),
            Cell::new(&m.value),
            Cell::new(m.change.as_deref().unwrap_or("-")),
        ]);
    }

    let mut units = new_table(vec!["Unit", "Driver", "Status", "Location", "ETA"]);
    for u in center.fleet().all_units() {
        units.add_row(vec![
            Cell::new(&u.id),
            Cell::new(&u.driver_name),
            Cell::new(driver_status_text(u.status)),
            Cell::new(&u.location),
            Cell::new(
                u.eta_minutes
                    .map(|m| format!("{} min", m))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }

    let mut zones = new_table(vec!["Zone", "Incidents", "Risk"]);
    for z in center.zones_by_incidents() {
        zones.add_row(vec![
            Cell::new(&z.name),
            Cell::new(z.incidents),
            Cell::new(risk_text(z.risk)),
        ]);
    }

    format!("{}\n\n{}\n\n{}", metrics, units, zones)
}

/// Format the control center as JSON
pub fn format_fleet_json(center: &ControlCenter) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "metrics": center.key_metrics(),
        "units": center.fleet().all_units(),
        "zones": center.zones_by_incidents(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient_snapshot(status: PatientStatus, eta: Option<u32>) -> PatientSnapshot {
        PatientSnapshot {
            status,
            eta_minutes: eta,
            progress: Some(1),
            unit_id: "A-7".to_string(),
        }
    }

    #[test]
    fn test_format_patient_snapshot() {
        colored::control::set_override(false);
        let output = format_patient_snapshot(&patient_snapshot(PatientStatus::OnWay, Some(8)));
        assert!(output.contains("onway"));
        assert!(output.contains("ETA 8 min"));
        assert!(output.contains("##-"));
        assert!(output.contains("On the Way"));
    }

    #[test]
    fn test_format_event_json_single_line() {
        let output =
            format_event_json("patient", &patient_snapshot(PatientStatus::Arrived, None)).unwrap();
        assert!(!output.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "patient");
        assert_eq!(parsed["data"]["status"], "arrived");
        assert!(parsed["data"]["eta_minutes"].is_null());
    }

    #[test]
    fn test_format_notification() {
        colored::control::set_override(false);
        let n = Notification::new("Status Updated", "En route to patient location");
        assert!(format_notification(&n).contains("Status Updated: En route"));
    }

    #[test]
    fn test_format_hospital_tables() {
        let output = format_hospital_tables(&HospitalBoard::demo());
        assert!(output.contains("ICU"));
        assert!(output.contains("75%"));
        assert!(output.contains("EMR-2848"));
        assert!(output.contains("41 beds available"));
    }

    #[test]
    fn test_format_hospital_json() {
        let output = format_hospital_json(&HospitalBoard::demo()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["beds"][0]["level"], "warning");
        assert_eq!(parsed["total_available"], 41);
        assert_eq!(parsed["incoming"][0]["id"], "EMR-2847");
    }

    #[test]
    fn test_format_fleet_json() {
        let output = format_fleet_json(&ControlCenter::demo()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["units"].as_array().unwrap().len(), 6);
        assert_eq!(parsed["zones"][0]["name"], "Downtown");
        assert_eq!(parsed["metrics"][1]["value"], "4/6");
    }

    #[test]
    fn test_format_fleet_tables() {
        let output = format_fleet_tables(&ControlCenter::demo());
        assert!(output.contains("Michael Chen"));
        assert!(output.contains("North District"));
    }
}
