use chrono::{NaiveDateTime, NaiveTime};
use tracing::warn;

const MINUTE_FORMAT: &str = "%H:%M";

/// Static set of `HH:MM` alarm times, compared by exact string equality.
///
/// Entries are not validated: a malformed one (say `"8:00"`) is kept, logged
/// once on construction, and simply never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerTimes {
    times: Vec<String>,
}

impl TriggerTimes {
    pub fn new(times: Vec<String>) -> Self {
        let set = Self { times };
        for bad in set.malformed() {
            warn!(trigger = %bad, "trigger time is not HH:MM and will never match");
        }
        set
    }

    /// The configured entry equal to `now` truncated to the minute, if any.
    pub fn matching(&self, now: NaiveDateTime) -> Option<&str> {
        let minute = now.format(MINUTE_FORMAT).to_string();
        self.times
            .iter()
            .find(|t| **t == minute)
            .map(String::as_str)
    }

    /// Entries that can never equal a formatted `HH:MM` clock reading.
    pub fn malformed(&self) -> Vec<&str> {
        self.times
            .iter()
            .filter(|t| !is_canonical_minute(t))
            .map(String::as_str)
            .collect()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.times
    }
}

fn is_canonical_minute(s: &str) -> bool {
    NaiveTime::parse_from_str(s, MINUTE_FORMAT)
        .map(|t| t.format(MINUTE_FORMAT).to_string() == s)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn triggers() -> TriggerTimes {
        TriggerTimes::new(vec!["08:00".to_string(), "20:00".to_string()])
    }

    #[test]
    fn exact_minute_matches_regardless_of_seconds() {
        assert_eq!(triggers().matching(at(8, 0, 0)), Some("08:00"));
        assert_eq!(triggers().matching(at(20, 0, 59)), Some("20:00"));
    }

    #[test]
    fn neighbouring_minutes_do_not_match() {
        assert_eq!(triggers().matching(at(7, 59, 59)), None);
        assert_eq!(triggers().matching(at(8, 1, 0)), None);
    }

    #[test]
    fn malformed_entries_never_match() {
        let t = TriggerTimes::new(vec!["8:00".to_string(), "25:00".to_string(), "20:00".to_string()]);
        assert_eq!(t.malformed(), vec!["8:00", "25:00"]);
        assert_eq!(t.matching(at(8, 0, 0)), None);
        assert_eq!(t.matching(at(20, 0, 0)), Some("20:00"));
    }

    #[test]
    fn empty_set_never_matches() {
        let t = TriggerTimes::new(Vec::new());
        assert_eq!(t.matching(at(8, 0, 0)), None);
        assert!(t.malformed().is_empty());
    }
}
