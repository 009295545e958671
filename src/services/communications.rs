// Communications service: log outreach events against one or more companies.
// The log is append-only; there is no edit or delete path.

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ValidationError};
use crate::session::{Role, Session};
use crate::status::parse_event_date;
use crate::store::DocumentStore;
use crate::types::{CommunicationEvent, CommunicationMethod};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogCommunicationForm {
    pub communication_type: String,
    pub communication_date: String,
    #[serde(default)]
    pub notes: String,
}

/// Validate the form against the configured methods.
///
/// When no methods are configured any non-empty type is accepted; otherwise
/// the type must name one of them (case-insensitive) and is stored with the
/// method's own spelling.
fn validate(
    form: &LogCommunicationForm,
    methods: &[CommunicationMethod],
) -> Result<CommunicationEvent, ValidationError> {
    let kind = form.communication_type.trim();
    if kind.is_empty() {
        return Err(ValidationError::new(
            "communicationType",
            "Communication type is required",
        ));
    }
    let kind = if methods.is_empty() {
        kind.to_string()
    } else {
        methods
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(kind))
            .map(|m| m.name.clone())
            .ok_or_else(|| {
                ValidationError::new(
                    "communicationType",
                    format!("Unknown communication method: {kind}"),
                )
            })?
    };

    let date = form.communication_date.trim();
    if date.is_empty() {
        return Err(ValidationError::new(
            "communicationDate",
            "Date of communication is required",
        ));
    }
    if parse_event_date(date).is_none() {
        return Err(ValidationError::new(
            "communicationDate",
            format!("Not a valid date: {date}"),
        ));
    }

    let notes = form.notes.trim();
    Ok(CommunicationEvent {
        kind,
        date: date.to_string(),
        notes: (!notes.is_empty()).then(|| notes.to_string()),
    })
}

/// Append one event to every selected company, all or nothing.
pub fn log_communication(
    store: &impl DocumentStore,
    session: &Session,
    company_ids: &[String],
    form: &LogCommunicationForm,
) -> Result<CommunicationEvent, ServiceError> {
    session.require(Role::User)?;
    if company_ids.is_empty() {
        return Err(ValidationError::new("companies", "Select at least one company").into());
    }

    let methods = store.list_methods()?;
    let event = validate(form, &methods)?;

    if !store.append_communications(company_ids, &event)? {
        let missing = company_ids
            .iter()
            .find(|id| matches!(store.get_company(id), Ok(None)))
            .cloned()
            .unwrap_or_else(|| company_ids.join(","));
        return Err(ServiceError::not_found("Company", &missing));
    }

    log::info!(
        "{} logged {} on {} for {} compan{}",
        session.email,
        event.kind,
        event.date,
        company_ids.len(),
        if company_ids.len() == 1 { "y" } else { "ies" }
    );
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use crate::db::CommsDb;
    use crate::types::{Company, Periodicity};

    fn user() -> Session {
        Session {
            email: "rep@example.com".to_string(),
            role: Role::User,
        }
    }

    fn seed_company(db: &CommsDb, id: &str) {
        db.upsert_company(&Company {
            id: id.to_string(),
            name: id.to_string(),
            location: "Madrid".to_string(),
            linkedin: "https://linkedin.com/company/x".to_string(),
            emails: vec!["x@x.test".to_string()],
            phone_numbers: vec!["3".to_string()],
            comments: String::new(),
            communication_periodicity: Periodicity::days(7.0),
            communication_dates: Vec::new(),
        })
        .unwrap();
    }

    fn seed_method(db: &CommsDb, name: &str) {
        db.insert_method(&CommunicationMethod {
            id: name.to_lowercase(),
            name: name.to_string(),
            description: "d".to_string(),
            sequence: 1,
            mandatory: false,
        })
        .unwrap();
    }

    fn form(kind: &str, date: &str) -> LogCommunicationForm {
        LogCommunicationForm {
            communication_type: kind.to_string(),
            communication_date: date.to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_log_to_several_companies() {
        let db = test_db();
        seed_company(&db, "a");
        seed_company(&db, "b");
        seed_method(&db, "Email");

        let ids = vec!["a".to_string(), "b".to_string()];
        let mut f = form("email", "2024-01-09");
        f.notes = "  sent deck ".to_string();
        let event = log_communication(&db, &user(), &ids, &f).unwrap();

        assert_eq!(event.kind, "Email");
        assert_eq!(event.notes.as_deref(), Some("sent deck"));
        assert_eq!(db.get_communications("a").unwrap().len(), 1);
        assert_eq!(db.get_communications("b").unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_method_rejected_when_methods_configured() {
        let db = test_db();
        seed_company(&db, "a");
        seed_method(&db, "Email");
        let err = log_communication(&db, &user(), &["a".to_string()], &form("Fax", "2024-01-09"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref v) if v.field == "communicationType"));
    }

    #[test]
    fn test_any_type_accepted_without_methods() {
        let db = test_db();
        seed_company(&db, "a");
        let event =
            log_communication(&db, &user(), &["a".to_string()], &form("Fax", "2024-01-09"))
                .unwrap();
        assert_eq!(event.kind, "Fax");
        assert_eq!(event.notes, None);
    }

    #[test]
    fn test_date_required_and_parseable() {
        let db = test_db();
        seed_company(&db, "a");
        for bad in ["", "tomorrow"] {
            let err = log_communication(&db, &user(), &["a".to_string()], &form("Email", bad))
                .unwrap_err();
            assert!(
                matches!(err, ServiceError::Validation(ref v) if v.field == "communicationDate")
            );
        }
        assert!(db.get_communications("a").unwrap().is_empty());
    }

    #[test]
    fn test_missing_company_writes_nothing() {
        let db = test_db();
        seed_company(&db, "a");
        let ids = vec!["a".to_string(), "ghost".to_string()];
        let err = log_communication(&db, &user(), &ids, &form("Email", "2024-01-09")).unwrap_err();
        match err {
            ServiceError::NotFound { id, .. } => assert_eq!(id, "ghost"),
            other => panic!("expected not found, got {other:?}"),
        }
        assert!(db.get_communications("a").unwrap().is_empty());
    }

    #[test]
    fn test_empty_selection_rejected() {
        let db = test_db();
        assert!(log_communication(&db, &user(), &[], &form("Email", "2024-01-09")).is_err());
    }

    #[test]
    fn test_admins_do_not_log_communications() {
        let db = test_db();
        seed_company(&db, "a");
        let admin = Session {
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        };
        let err = log_communication(&db, &admin, &["a".to_string()], &form("Email", "2024-01-09"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Access(_)));
    }
}
