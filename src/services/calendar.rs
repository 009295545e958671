// Calendar service: one company's log as dated calendar entries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AccessError, ServiceError};
use crate::session::Session;
use crate::status::parse_event_date;
use crate::store::DocumentStore;
use crate::types::CommunicationEvent;

const UNTYPED_TITLE: &str = "No Type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    Scheduled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub title: String,
    pub date: DateTime<Utc>,
    pub kind: EntryKind,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub company_id: String,
    pub company_name: String,
    pub entries: Vec<CalendarEntry>,
}

/// Events without a parseable date are left off the calendar.
pub fn calendar_entries(events: &[CommunicationEvent], now: DateTime<Utc>) -> Vec<CalendarEntry> {
    events
        .iter()
        .filter_map(|event| {
            let date = parse_event_date(&event.date)?;
            let title = event.kind.trim();
            Some(CalendarEntry {
                title: if title.is_empty() {
                    UNTYPED_TITLE.to_string()
                } else {
                    title.to_string()
                },
                date,
                kind: if date > now {
                    EntryKind::Scheduled
                } else {
                    EntryKind::Completed
                },
                notes: event.notes.clone(),
            })
        })
        .collect()
}

pub fn get_calendar(
    store: &impl DocumentStore,
    session: Option<&Session>,
    company_id: &str,
    now: DateTime<Utc>,
) -> Result<CalendarView, ServiceError> {
    session.ok_or(AccessError::NotSignedIn)?;
    let company = store
        .get_company(company_id)?
        .ok_or_else(|| ServiceError::not_found("Company", company_id))?;
    Ok(CalendarView {
        entries: calendar_entries(&company.communication_dates, now),
        company_id: company.id,
        company_name: company.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use crate::session::Role;
    use crate::types::{Company, Periodicity};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_entries_split_past_and_future() {
        let events = vec![
            CommunicationEvent::new("Email", "2024-01-02").with_notes("intro"),
            CommunicationEvent::new("", "2024-02-01"),
            CommunicationEvent::new("Call", "someday"),
        ];
        let entries = calendar_entries(&events, now());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Email");
        assert_eq!(entries[0].kind, EntryKind::Completed);
        assert_eq!(entries[0].notes.as_deref(), Some("intro"));
        assert_eq!(entries[1].title, "No Type");
        assert_eq!(entries[1].kind, EntryKind::Scheduled);
    }

    #[test]
    fn test_event_at_now_is_completed() {
        let events = vec![CommunicationEvent::new("Call", "2024-01-10T12:00:00Z")];
        assert_eq!(calendar_entries(&events, now())[0].kind, EntryKind::Completed);
    }

    #[test]
    fn test_get_calendar_for_company() {
        let db = test_db();
        db.upsert_company(&Company {
            id: "c1".to_string(),
            name: "Acme".to_string(),
            location: "Rome".to_string(),
            linkedin: "https://linkedin.com/company/acme".to_string(),
            emails: vec!["a@acme.test".to_string()],
            phone_numbers: vec!["1".to_string()],
            comments: String::new(),
            communication_periodicity: Periodicity::days(7.0),
            communication_dates: Vec::new(),
        })
        .unwrap();
        db.append_communication("c1", &CommunicationEvent::new("Email", "2024-01-15"))
            .unwrap();

        let user = Session {
            email: "rep@example.com".to_string(),
            role: Role::User,
        };
        let view = get_calendar(&db, Some(&user), "c1", now()).unwrap();
        assert_eq!(view.company_name, "Acme");
        assert_eq!(view.entries[0].kind, EntryKind::Scheduled);

        assert!(matches!(
            get_calendar(&db, Some(&user), "ghost", now()),
            Err(ServiceError::NotFound { .. })
        ));
    }
}
