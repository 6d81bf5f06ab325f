//! Text rendering for the operator commands. Every view takes the session
//! state explicitly and decides what to show from it.

use pillbox_core::{
    dates,
    session::{SessionState, Tab},
    MedicineRecord,
};

const EMPTY_TABLE: &str = "No medicines registered.";

/// Render `records` for whatever tab `state` has in front.
///
/// - `Manage`: the full table.
/// - `Register`: confirmation for the freshly saved record (first entry).
/// - `Edit`: confirmation for the record matching `state.editing_id`.
pub fn render(state: &SessionState, records: &[MedicineRecord]) -> String {
    match state.active_tab {
        Tab::Manage => table(records),
        Tab::Register => match records.first() {
            Some(r) => format!("Registered medicine #{}\n{}", r.id, detail(r)),
            None => "Nothing registered.".to_string(),
        },
        Tab::Edit => match state
            .editing_id
            .and_then(|id| records.iter().find(|r| r.id == id))
        {
            Some(r) => format!("Updated medicine #{}\n{}", r.id, detail(r)),
            None => "Nothing to edit.".to_string(),
        },
    }
}

fn table(records: &[MedicineRecord]) -> String {
    if records.is_empty() {
        return EMPTY_TABLE.to_string();
    }
    let mut out = format!(
        "{:>4}  {:<20} {:<12} {:<18} {}",
        "ID", "Name", "Qty", "Freq", "Period"
    );
    for r in records {
        out.push('\n');
        out.push_str(&format!(
            "{:>4}  {:<20} {:<12} {:<18} {}",
            r.id,
            r.name,
            r.quantity,
            r.frequency,
            period(r)
        ));
    }
    out
}

fn detail(r: &MedicineRecord) -> String {
    let mut out = format!(
        "  name:      {}\n  quantity:  {}\n  frequency: {}\n  period:    {}",
        r.name,
        r.quantity,
        r.frequency,
        period(r)
    );
    if !r.phone.is_empty() {
        out.push_str(&format!("\n  phone:     {}", r.phone));
    }
    out
}

fn period(r: &MedicineRecord) -> String {
    format!(
        "{} -> {}",
        dates::to_display(&r.start_date),
        dates::to_display(&r.end_date)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str) -> MedicineRecord {
        MedicineRecord {
            id,
            name: name.to_string(),
            quantity: "5ml".to_string(),
            frequency: "every 8 hours".to_string(),
            phone: String::new(),
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-10".to_string(),
            deleted: false,
        }
    }

    #[test]
    fn manage_tab_shows_table_with_display_dates() {
        let out = render(&SessionState::default(), &[record(1, "Amoxicillin")]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Name"));
        assert!(lines[1].contains("Amoxicillin"));
        assert!(lines[1].contains("01/01/2024 -> 10/01/2024"));
    }

    #[test]
    fn manage_tab_with_no_records() {
        assert_eq!(render(&SessionState::default(), &[]), EMPTY_TABLE);
    }

    #[test]
    fn register_tab_confirms_first_record() {
        let out = render(&SessionState::register(), &[record(9, "Dipyrone")]);
        assert!(out.starts_with("Registered medicine #9"));
        assert!(!out.contains("phone"));
    }

    #[test]
    fn edit_tab_picks_the_record_being_edited() {
        let records = [record(1, "A"), record(2, "B")];
        let out = render(&SessionState::editing(2), &records);
        assert!(out.starts_with("Updated medicine #2"));
        assert!(out.contains("name:      B"));
    }

    #[test]
    fn edit_tab_without_match() {
        let out = render(&SessionState::editing(5), &[record(1, "A")]);
        assert_eq!(out, "Nothing to edit.");
    }
}
