use serde::{Deserialize, Serialize};

/// Which view of the operator shell is in front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    /// Table of active medicines with remove actions.
    #[default]
    Manage,
    /// Form for a new medicine.
    Register,
    /// Form pre-filled with an existing medicine.
    Edit,
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tab::Manage => "manage",
            Tab::Register => "register",
            Tab::Edit => "edit",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "manage" => Ok(Tab::Manage),
            "register" => Ok(Tab::Register),
            "edit" => Ok(Tab::Edit),
            other => Err(format!("unknown tab: {other}")),
        }
    }
}

/// Per-interaction state of one operator session.
///
/// Passed explicitly into every view render; there is no ambient copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Tab shown by the next render. Defaults to [`Tab::Manage`].
    pub active_tab: Tab,
    /// Record currently loaded into the edit form. Defaults to none.
    pub editing_id: Option<i64>,
}

impl SessionState {
    pub fn register() -> Self {
        Self {
            active_tab: Tab::Register,
            editing_id: None,
        }
    }

    pub fn editing(id: i64) -> Self {
        Self {
            active_tab: Tab::Edit,
            editing_id: Some(id),
        }
    }

    /// Leave whatever form was open and go back to the table.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_editing(&self) -> bool {
        self.active_tab == Tab::Edit && self.editing_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_shows_table() {
        let s = SessionState::default();
        assert_eq!(s.active_tab, Tab::Manage);
        assert_eq!(s.editing_id, None);
        assert!(!s.is_editing());
    }

    #[test]
    fn reset_clears_edit_target() {
        let mut s = SessionState::editing(4);
        assert!(s.is_editing());
        s.reset();
        assert_eq!(s, SessionState::default());
    }

    #[test]
    fn tab_names_round_trip() {
        for tab in [Tab::Manage, Tab::Register, Tab::Edit] {
            assert_eq!(tab.to_string().parse::<Tab>().unwrap(), tab);
        }
        assert!("settings".parse::<Tab>().is_err());
    }
}
