//! Shared type definitions for the database layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Company, CommunicationEvent, Periodicity, PeriodicityUnit};

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

/// A row from the `companies` table, before contact lists and the
/// communication log are attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbCompany {
    pub id: String,
    pub name: String,
    pub location: String,
    pub linkedin: String,
    pub comments: String,
    pub periodicity_value: f64,
    /// NULL for rows written before the unit column existed.
    pub periodicity_unit: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl DbCompany {
    /// Resolve the stored unit, falling back to `default_unit` when the row
    /// has none or carries an unknown tag.
    pub fn periodicity(&self, default_unit: PeriodicityUnit) -> Periodicity {
        let unit = match self.periodicity_unit.as_deref() {
            Some(raw) => PeriodicityUnit::parse(raw).unwrap_or_else(|| {
                log::warn!(
                    "company {}: unknown periodicity unit {:?}, using {}",
                    self.id,
                    raw,
                    default_unit.as_str()
                );
                default_unit
            }),
            None => default_unit,
        };
        Periodicity {
            value: self.periodicity_value,
            unit,
        }
    }

    pub fn into_company(
        self,
        default_unit: PeriodicityUnit,
        emails: Vec<String>,
        phone_numbers: Vec<String>,
        communication_dates: Vec<CommunicationEvent>,
    ) -> Company {
        let communication_periodicity = self.periodicity(default_unit);
        Company {
            id: self.id,
            name: self.name,
            location: self.location,
            linkedin: self.linkedin,
            emails,
            phone_numbers,
            comments: self.comments,
            communication_periodicity,
            communication_dates,
        }
    }
}

/// A row from the `communications` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbCommunication {
    pub id: i64,
    pub company_id: String,
    pub kind: String,
    pub date: String,
    pub notes: Option<String>,
    pub logged_at: String,
}

impl From<DbCommunication> for CommunicationEvent {
    fn from(row: DbCommunication) -> Self {
        CommunicationEvent {
            kind: row.kind,
            date: row.date,
            notes: row.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(unit: Option<&str>) -> DbCompany {
        DbCompany {
            id: "c1".to_string(),
            name: "Acme".to_string(),
            location: "Berlin".to_string(),
            linkedin: "https://linkedin.com/company/acme".to_string(),
            comments: String::new(),
            periodicity_value: 2.0,
            periodicity_unit: unit.map(str::to_string),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_null_unit_uses_default() {
        let p = row(None).periodicity(PeriodicityUnit::Weeks);
        assert_eq!(p, Periodicity::weeks(2.0));
    }

    #[test]
    fn test_stored_unit_wins_over_default() {
        let p = row(Some("days")).periodicity(PeriodicityUnit::Weeks);
        assert_eq!(p, Periodicity::days(2.0));
    }

    #[test]
    fn test_unknown_unit_falls_back() {
        let p = row(Some("months")).periodicity(PeriodicityUnit::Days);
        assert_eq!(p.unit, PeriodicityUnit::Days);
    }
}
