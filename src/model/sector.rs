//! Setores e servidores.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::RecordId;
use super::validation::{self, Validate, ValidationError};

pub const SECTOR_CODE_MAX: usize = 5;
pub const NAME_MAX: usize = 120;

/// Unidade organizacional identificada pela sigla.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub code: String,
}

impl Sector {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl Validate for Sector {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::required_text("Setor", &self.code, SECTOR_CODE_MAX)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Servidor lotado em um setor, com período de exercício.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub name: String,
    pub sector: RecordId,
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Staff {
    pub fn new(name: impl Into<String>, sector: RecordId, entry_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            sector,
            entry_date,
            exit_date: None,
            active: true,
        }
    }
}

impl Validate for Staff {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::required_text("Nome", &self.name, NAME_MAX)?;
        if let Some((entry, exit)) = validation::out_of_order(self.entry_date, self.exit_date) {
            return Err(ValidationError::EntryAfterExit { entry, exit });
        }
        Ok(())
    }
}

impl fmt::Display for Staff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sector_code_limits() {
        assert!(Sector::new("SUFGI").validate().is_ok());
        assert!(matches!(
            Sector::new("SEMADUR").validate(),
            Err(ValidationError::TooLong { max: 5, .. })
        ));
        assert!(matches!(
            Sector::new("").validate(),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn staff_exit_before_entry_fails() {
        let mut staff = Staff::new("Maria", RecordId::new(), date(2024, 3, 1));
        staff.exit_date = Some(date(2024, 2, 1));
        assert_eq!(
            staff.validate(),
            Err(ValidationError::EntryAfterExit {
                entry: date(2024, 3, 1),
                exit: date(2024, 2, 1),
            })
        );
    }

    #[test]
    fn staff_without_exit_is_valid() {
        let staff = Staff::new("Maria", RecordId::new(), date(2024, 3, 1));
        assert!(staff.validate().is_ok());
        assert!(staff.active);
    }

    #[test]
    fn staff_defaults_active_when_missing_from_json() {
        let json = format!(
            r#"{{"name":"José","sector":"{}","entry_date":"2020-01-02"}}"#,
            RecordId::new()
        );
        let staff: Staff = serde_json::from_str(&json).unwrap();
        assert!(staff.active);
        assert_eq!(staff.exit_date, None);
    }

    proptest! {
        #[test]
        fn staff_validity_follows_date_order(entry in 0i64..5_000, exit in 0i64..5_000) {
            let base = date(2000, 1, 1);
            let mut staff = Staff::new("Servidor", RecordId::new(), base + chrono::Duration::days(entry));
            staff.exit_date = Some(base + chrono::Duration::days(exit));
            prop_assert_eq!(staff.validate().is_ok(), entry <= exit);
        }
    }
}
