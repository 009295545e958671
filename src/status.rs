//! Communication status engine (pure, no I/O).
//!
//! Classifies a company's communication log against its periodicity: how many
//! events fall outside the allowed window (overdue), how many sit within a day
//! of now (due today), and which future event comes next. `now` is always a
//! parameter so results are deterministic and recomputed on every read.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::error::StatusError;
use crate::types::{CommunicationEvent, Periodicity};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Events at most this many whole days from now count as due today.
const DUE_TODAY_WINDOW_DAYS: i64 = 1;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The earliest future-dated communication for a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextScheduled {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: DateTime<Utc>,
}

/// Derived per-company status. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationStatusSummary {
    pub overdue_count: usize,
    pub due_today_count: usize,
    pub next_scheduled: Option<NextScheduled>,
    /// Events ignored because their date could not be parsed.
    pub skipped_count: usize,
}

/// Totals across many companies, used for the notification badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetCounts {
    pub overdue_total: usize,
    pub due_today_total: usize,
}

impl FleetCounts {
    pub fn badge(&self) -> usize {
        self.overdue_total + self.due_today_total
    }
}

/// Parse a stored event date.
///
/// Accepts RFC 3339, naive date-times (read as UTC) and bare `YYYY-MM-DD`
/// dates (UTC midnight). Returns `None` for anything else.
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whole days between `now` and `date`, in either direction.
pub fn elapsed_days(now: DateTime<Utc>, date: DateTime<Utc>) -> i64 {
    (now - date).num_milliseconds().abs() / MS_PER_DAY
}

/// Overdue test. Symmetric: a date far in the future is also outside the
/// window. Tests pin this behavior.
pub fn is_outside_window(elapsed: i64, periodicity_days: f64) -> bool {
    elapsed as f64 > periodicity_days
}

pub fn is_within_due_today(elapsed: i64) -> bool {
    elapsed <= DUE_TODAY_WINDOW_DAYS
}

fn validate_periodicity(periodicity_days: f64) -> Result<(), StatusError> {
    if periodicity_days.is_finite() && periodicity_days > 0.0 {
        Ok(())
    } else {
        Err(StatusError::InvalidPeriodicity(periodicity_days))
    }
}

/// Classify a company's communication log.
///
/// `events` may be unordered. When two future events share the exact same
/// instant the one earlier in `events` is kept as `next_scheduled`.
pub fn compute_status(
    events: &[CommunicationEvent],
    periodicity_days: f64,
    now: DateTime<Utc>,
) -> Result<CommunicationStatusSummary, StatusError> {
    validate_periodicity(periodicity_days)?;

    let mut summary = CommunicationStatusSummary::default();

    for event in events {
        let Some(date) = parse_event_date(&event.date) else {
            log::debug!(
                "status: skipping {} event with unparseable date {:?}",
                event.kind,
                event.date
            );
            summary.skipped_count += 1;
            continue;
        };

        let elapsed = elapsed_days(now, date);
        if is_outside_window(elapsed, periodicity_days) {
            summary.overdue_count += 1;
        } else if is_within_due_today(elapsed) {
            summary.due_today_count += 1;
        }

        if date > now {
            let earlier = match &summary.next_scheduled {
                Some(current) => date < current.date,
                None => true,
            };
            if earlier {
                summary.next_scheduled = Some(NextScheduled {
                    kind: event.kind.clone(),
                    date,
                });
            }
        }
    }

    Ok(summary)
}

/// Same as [`compute_status`], normalizing a unit-tagged periodicity first.
pub fn compute_status_for(
    events: &[CommunicationEvent],
    periodicity: &Periodicity,
    now: DateTime<Utc>,
) -> Result<CommunicationStatusSummary, StatusError> {
    compute_status(events, periodicity.to_days(), now)
}

/// Sum overdue and due-today counts across companies.
pub fn aggregate_fleet_counts<'a, I>(summaries: I) -> FleetCounts
where
    I: IntoIterator<Item = &'a CommunicationStatusSummary>,
{
    summaries
        .into_iter()
        .fold(FleetCounts::default(), |acc, s| FleetCounts {
            overdue_total: acc.overdue_total + s.overdue_count,
            due_today_total: acc.due_today_total + s.due_today_count,
        })
}
