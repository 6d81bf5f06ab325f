//! Rendering of the reminder message sent at each trigger time.
//!
//! ```text
//! Medicine reminder for 05/01/2024 at 08:00
//! - Paracetamol: 500mg, every 8h (01/01/2024 to 10/01/2024)
//! - Amoxicillin: 5ml, every 12h (02/01/2024 to 09/01/2024)
//! ```

use chrono::NaiveDateTime;
use pillbox_core::{dates, MedicineRecord};

/// Build the single digest for `records`. The caller guarantees the slice is
/// non-empty; an empty slice still yields a header-only message.
pub fn render_digest(now: NaiveDateTime, trigger: &str, records: &[MedicineRecord]) -> String {
    let date = now.format(dates::DISPLAY_FORMAT);
    let mut out = format!("Medicine reminder for {date} at {trigger}");
    for record in records {
        out.push('\n');
        out.push_str(&render_line(record));
    }
    out
}

fn render_line(r: &MedicineRecord) -> String {
    format!(
        "- {}: {}, {} ({} to {})",
        r.name,
        r.quantity,
        r.frequency,
        dates::to_display(&r.start_date),
        dates::to_display(&r.end_date),
    )
}
