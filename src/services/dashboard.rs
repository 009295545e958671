// Dashboard service: per-company status rows for the user view.
// Everything is recomputed from the log on each call; nothing is cached.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ServiceError;
use crate::session::{Role, Session};
use crate::status::{
    aggregate_fleet_counts, parse_event_date, CommunicationStatusSummary, FleetCounts,
};
use crate::store::DocumentStore;
use crate::types::{Company, CommunicationEvent};

use super::company_status;

/// Row emphasis: overdue wins over due-today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Highlight {
    Overdue,
    DueToday,
    Normal,
}

impl Highlight {
    pub fn for_summary(summary: &CommunicationStatusSummary) -> Self {
        if summary.overdue_count > 0 {
            Highlight::Overdue
        } else if summary.due_today_count > 0 {
            Highlight::DueToday
        } else {
            Highlight::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRow {
    pub company_id: String,
    pub company_name: String,
    #[serde(flatten)]
    pub summary: CommunicationStatusSummary,
    pub highlight: Highlight,
    /// Most recent logged events, oldest first.
    pub recent: Vec<CommunicationEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub rows: Vec<DashboardRow>,
    pub totals: FleetCounts,
    pub badge: usize,
    pub generated_at: DateTime<Utc>,
}

/// The last `limit` events in log order, leaving out any that fall on the
/// same UTC calendar day as the next scheduled communication.
pub fn recent_communications(
    events: &[CommunicationEvent],
    summary: &CommunicationStatusSummary,
    limit: usize,
) -> Vec<CommunicationEvent> {
    let scheduled_day = summary.next_scheduled.as_ref().map(|n| n.date.date_naive());
    let kept: Vec<&CommunicationEvent> = events
        .iter()
        .filter(|e| match (scheduled_day, parse_event_date(&e.date)) {
            (Some(day), Some(date)) => date.date_naive() != day,
            _ => true,
        })
        .collect();
    let start = kept.len().saturating_sub(limit);
    kept[start..].iter().map(|e| (*e).clone()).collect()
}

/// Build the dashboard for a snapshot of companies. Pure.
pub fn build_dashboard(
    companies: &[Company],
    now: DateTime<Utc>,
    recent_limit: usize,
) -> DashboardView {
    let rows: Vec<DashboardRow> = companies
        .iter()
        .map(|company| {
            let summary = company_status(company, now);
            DashboardRow {
                company_id: company.id.clone(),
                company_name: company.name.clone(),
                highlight: Highlight::for_summary(&summary),
                recent: recent_communications(&company.communication_dates, &summary, recent_limit),
                summary,
            }
        })
        .collect();

    let totals = aggregate_fleet_counts(rows.iter().map(|r| &r.summary));
    DashboardView {
        badge: totals.badge(),
        rows,
        totals,
        generated_at: now,
    }
}

pub fn get_dashboard(
    store: &impl DocumentStore,
    session: &Session,
    now: DateTime<Utc>,
    recent_limit: usize,
) -> Result<DashboardView, ServiceError> {
    session.require(Role::User)?;
    let companies = store.list_companies()?;
    let view = build_dashboard(&companies, now, recent_limit);
    log::debug!(
        "dashboard: {} companies, {} overdue, {} due today",
        view.rows.len(),
        view.totals.overdue_total,
        view.totals.due_today_total
    );
    Ok(view)
}
