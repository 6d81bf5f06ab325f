use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A stored medicine. Read-only from the reminder job's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineRecord {
    /// Assigned by the store on insert; never changes.
    pub id: i64,
    pub name: String,
    /// Free-text dosage, e.g. "5ml" or "1 tablet".
    pub quantity: String,
    /// Free-text schedule, e.g. "every 8 hours". Display only.
    pub frequency: String,
    /// Contact number in E.164 form. May be empty.
    #[serde(default)]
    pub phone: String,
    /// Canonical `YYYY-MM-DD`.
    pub start_date: String,
    /// Canonical `YYYY-MM-DD`.
    pub end_date: String,
    /// Soft-delete marker. Deleted records never appear in `list_active`.
    #[serde(default)]
    pub deleted: bool,
}

/// Field set for inserting a medicine or replacing an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedicine {
    pub name: String,
    pub quantity: String,
    pub frequency: String,
    #[serde(default)]
    pub phone: String,
    pub start_date: String,
    pub end_date: String,
}

impl NewMedicine {
    /// Reject records the operator shell would refuse to save: name, quantity
    /// and frequency must all be non-blank.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("quantity", &self.quantity),
            ("frequency", &self.frequency),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

impl From<MedicineRecord> for NewMedicine {
    fn from(r: MedicineRecord) -> Self {
        Self {
            name: r.name,
            quantity: r.quantity,
            frequency: r.frequency,
            phone: r.phone,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

/// Partial edit. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineUpdate {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub frequency: Option<String>,
    pub phone: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl MedicineUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.frequency.is_none()
            && self.phone.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Merge onto `current`, producing the full replacement field set.
    pub fn apply(self, current: MedicineRecord) -> NewMedicine {
        let base = NewMedicine::from(current);
        NewMedicine {
            name: self.name.unwrap_or(base.name),
            quantity: self.quantity.unwrap_or(base.quantity),
            frequency: self.frequency.unwrap_or(base.frequency),
            phone: self.phone.unwrap_or(base.phone),
            start_date: self.start_date.unwrap_or(base.start_date),
            end_date: self.end_date.unwrap_or(base.end_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewMedicine {
        NewMedicine {
            name: "Paracetamol".to_string(),
            quantity: "500mg".to_string(),
            frequency: "every 8h".to_string(),
            phone: String::new(),
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-10".to_string(),
        }
    }

    #[test]
    fn complete_medicine_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut m = sample();
        m.name = "   ".to_string();
        let err = m.validate().unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn empty_phone_is_allowed() {
        let m = sample();
        assert!(m.phone.is_empty());
        assert!(m.validate().is_ok());
    }

    #[test]
    fn update_keeps_untouched_fields() {
        let current = MedicineRecord {
            id: 7,
            name: "Amoxicillin".to_string(),
            quantity: "5ml".to_string(),
            frequency: "every 12h".to_string(),
            phone: "+5521111111111".to_string(),
            start_date: "2024-02-01".to_string(),
            end_date: "2024-02-07".to_string(),
            deleted: false,
        };
        let update = MedicineUpdate {
            quantity: Some("10ml".to_string()),
            ..Default::default()
        };
        let merged = update.apply(current);
        assert_eq!(merged.name, "Amoxicillin");
        assert_eq!(merged.quantity, "10ml");
        assert_eq!(merged.phone, "+5521111111111");
        assert_eq!(merged.end_date, "2024-02-07");
    }

    #[test]
    fn default_update_is_empty() {
        assert!(MedicineUpdate::default().is_empty());
    }
}
