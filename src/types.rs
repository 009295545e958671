//! Shared domain types: companies, communication methods, logged events, config.

use serde::{Deserialize, Serialize};

/// Unit a company's communication periodicity is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodicityUnit {
    #[default]
    Days,
    Weeks,
}

impl PeriodicityUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodicityUnit::Days => "days",
            PeriodicityUnit::Weeks => "weeks",
        }
    }

    /// Parse a stored unit tag. Unknown tags return `None` so the caller can
    /// fall back to the configured default.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Some(PeriodicityUnit::Days),
            "week" | "weeks" => Some(PeriodicityUnit::Weeks),
            _ => None,
        }
    }

    fn days_per_unit(&self) -> f64 {
        match self {
            PeriodicityUnit::Days => 1.0,
            PeriodicityUnit::Weeks => 7.0,
        }
    }
}

/// Expected cadence between communications, tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Periodicity {
    pub value: f64,
    #[serde(default)]
    pub unit: PeriodicityUnit,
}

impl Periodicity {
    pub fn days(value: f64) -> Self {
        Self {
            value,
            unit: PeriodicityUnit::Days,
        }
    }

    pub fn weeks(value: f64) -> Self {
        Self {
            value,
            unit: PeriodicityUnit::Weeks,
        }
    }

    /// Normalize to days. Validation of the result is the engine's job.
    pub fn to_days(&self) -> f64 {
        self.value * self.unit.days_per_unit()
    }
}

/// One logged (or scheduled) outreach event against a company.
///
/// `date` is kept exactly as stored; parsing happens in the status engine so a
/// bad value degrades to a skipped event instead of a failed read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CommunicationEvent {
    pub fn new(kind: &str, date: &str) -> Self {
        Self {
            kind: kind.to_string(),
            date: date.to_string(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

/// A configurable communication channel (LinkedIn post, email, call, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationMethod {
    pub id: String,
    pub name: String,
    pub description: String,
    pub sequence: u32,
    /// Informational only; nothing enforces it.
    pub mandatory: bool,
}

/// A company on the outreach roster, with its append-only communication log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub location: String,
    pub linkedin: String,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub comments: String,
    pub communication_periodicity: Periodicity,
    #[serde(default)]
    pub communication_dates: Vec<CommunicationEvent>,
}

/// Application configuration stored at `~/.commtrack/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding `commtrack.db`. Defaults to `~/.commtrack`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Signed-in emails that get the admin role.
    #[serde(default)]
    pub admin_emails: Vec<String>,
    /// Unit applied to periodicity values stored without one.
    #[serde(default)]
    pub default_periodicity_unit: PeriodicityUnit,
    /// How many past communications the dashboard shows per company.
    #[serde(default = "default_recent_limit")]
    pub recent_communication_limit: usize,
}

fn default_recent_limit() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            admin_emails: Vec::new(),
            default_periodicity_unit: PeriodicityUnit::default(),
            recent_communication_limit: default_recent_limit(),
        }
    }
}
