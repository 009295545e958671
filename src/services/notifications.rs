// Notifications service: overdue and due-today lists across the roster.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AccessError, ServiceError};
use crate::session::Session;
use crate::status::{aggregate_fleet_counts, FleetCounts, NextScheduled};
use crate::store::DocumentStore;
use crate::types::Company;

use super::company_status;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    pub company_id: String,
    pub company_name: String,
    pub count: usize,
    pub next_scheduled: Option<NextScheduled>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsView {
    pub overdue: Vec<NotificationItem>,
    pub due_today: Vec<NotificationItem>,
    pub totals: FleetCounts,
    pub badge: usize,
}

fn item(company: &Company, count: usize, next: &Option<NextScheduled>) -> NotificationItem {
    let note = company.comments.trim();
    NotificationItem {
        company_id: company.id.clone(),
        company_name: company.name.clone(),
        count,
        next_scheduled: next.clone(),
        note: (!note.is_empty()).then(|| note.to_string()),
    }
}

/// A company lands in both lists when it has both kinds of events.
pub fn build_notifications(companies: &[Company], now: DateTime<Utc>) -> NotificationsView {
    let mut overdue = Vec::new();
    let mut due_today = Vec::new();
    let mut summaries = Vec::with_capacity(companies.len());

    for company in companies {
        let summary = company_status(company, now);
        if summary.overdue_count > 0 {
            overdue.push(item(company, summary.overdue_count, &summary.next_scheduled));
        }
        if summary.due_today_count > 0 {
            due_today.push(item(company, summary.due_today_count, &summary.next_scheduled));
        }
        summaries.push(summary);
    }

    let totals = aggregate_fleet_counts(&summaries);
    NotificationsView {
        overdue,
        due_today,
        badge: totals.badge(),
        totals,
    }
}

/// Available to any signed-in role.
pub fn get_notifications(
    store: &impl DocumentStore,
    session: Option<&Session>,
    now: DateTime<Utc>,
) -> Result<NotificationsView, ServiceError> {
    let session = session.ok_or(AccessError::NotSignedIn)?;
    let view = build_notifications(&store.list_companies()?, now);
    log::debug!(
        "notifications for {}: {} overdue, {} due today",
        session.email,
        view.overdue.len(),
        view.due_today.len()
    );
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use crate::session::Role;
    use crate::types::{CommunicationEvent, Periodicity};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    fn company(id: &str, comments: &str, events: Vec<CommunicationEvent>) -> Company {
        Company {
            id: id.to_string(),
            name: format!("{id} Inc"),
            location: "Oslo".to_string(),
            linkedin: "https://linkedin.com/company/x".to_string(),
            emails: vec!["x@x.test".to_string()],
            phone_numbers: vec!["1".to_string()],
            comments: comments.to_string(),
            communication_periodicity: Periodicity::days(5.0),
            communication_dates: events,
        }
    }

    #[test]
    fn test_lists_split_by_kind() {
        let both = company(
            "a",
            "Prefers calls",
            vec![
                CommunicationEvent::new("Email", "2023-12-01"),
                CommunicationEvent::new("Call", "2024-01-10T09:00:00Z"),
                CommunicationEvent::new("Visit", "2024-01-14"),
            ],
        );
        let quiet = company("b", "", vec![CommunicationEvent::new("Email", "2024-01-07")]);
        let today = company("c", " ", vec![CommunicationEvent::new("Call", "2024-01-11T08:00:00Z")]);

        let view = build_notifications(&[both, quiet, today], now());

        assert_eq!(view.overdue.len(), 1);
        assert_eq!(view.overdue[0].company_id, "a");
        assert_eq!(view.overdue[0].note.as_deref(), Some("Prefers calls"));
        assert_eq!(view.overdue[0].next_scheduled.as_ref().unwrap().kind, "Visit");

        let ids: Vec<&str> = view.due_today.iter().map(|i| i.company_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(view.due_today[1].note, None);

        assert_eq!(view.totals.overdue_total, 1);
        assert_eq!(view.totals.due_today_total, 2);
        assert_eq!(view.badge, 3);
    }

    #[test]
    fn test_empty_roster() {
        let view = build_notifications(&[], now());
        assert!(view.overdue.is_empty());
        assert_eq!(view.badge, 0);
    }

    #[test]
    fn test_requires_a_session() {
        let db = test_db();
        assert!(matches!(
            get_notifications(&db, None, now()),
            Err(ServiceError::Access(AccessError::NotSignedIn))
        ));
        let admin = Session {
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        };
        assert!(get_notifications(&db, Some(&admin), now()).is_ok());
    }
}
