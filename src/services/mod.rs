//! Service layer: thin glue between the view layer, the document store and
//! the status engine. Every operation takes the caller's session explicitly.

pub mod calendar;
pub mod communications;
pub mod companies;
pub mod dashboard;
pub mod live;
pub mod methods;
pub mod notifications;

use chrono::{DateTime, Utc};

use crate::status::{compute_status_for, CommunicationStatusSummary};
use crate::types::Company;

/// Status for one company, degrading to an empty summary when its
/// periodicity is invalid so one bad record cannot break a whole screen.
pub(crate) fn company_status(company: &Company, now: DateTime<Utc>) -> CommunicationStatusSummary {
    match compute_status_for(
        &company.communication_dates,
        &company.communication_periodicity,
        now,
    ) {
        Ok(summary) => summary,
        Err(e) => {
            log::warn!("company {} ({}): {}", company.id, company.name, e);
            CommunicationStatusSummary::default()
        }
    }
}

/// Split a comma-separated form field into trimmed, non-empty entries.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
