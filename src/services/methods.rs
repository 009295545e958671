// Communication methods service: admin-configured outreach channels.

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ValidationError};
use crate::session::{Role, Session};
use crate::store::DocumentStore;
use crate::types::CommunicationMethod;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodForm {
    pub name: String,
    pub description: String,
    pub sequence: i64,
    #[serde(default)]
    pub mandatory: bool,
}

fn validate(form: &MethodForm) -> Result<(String, String, u32), ValidationError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }
    let description = form.description.trim();
    if description.is_empty() {
        return Err(ValidationError::required("description"));
    }
    let sequence = u32::try_from(form.sequence)
        .ok()
        .filter(|s| *s > 0)
        .ok_or_else(|| ValidationError::new("sequence", "must be a positive integer"))?;
    Ok((name.to_string(), description.to_string(), sequence))
}

/// Methods in display order: `sequence` ascending, ties in insertion order.
pub fn list_methods(store: &impl DocumentStore) -> Result<Vec<CommunicationMethod>, ServiceError> {
    Ok(store.list_methods()?)
}

/// Suggested sequence for the next method added.
pub fn next_sequence(store: &impl DocumentStore) -> Result<u32, ServiceError> {
    Ok(sequence_after(store.list_methods()?.len()))
}

fn sequence_after(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX).saturating_add(1)
}

pub fn add_method(
    store: &impl DocumentStore,
    session: &Session,
    form: &MethodForm,
) -> Result<CommunicationMethod, ServiceError> {
    session.require(Role::Admin)?;
    let (name, description, sequence) = validate(form)?;

    let method = CommunicationMethod {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        description,
        sequence,
        mandatory: form.mandatory,
    };
    store.add_method(&method)?;
    log::info!("Added communication method {} (seq {})", method.name, method.sequence);
    Ok(method)
}

pub fn delete_method(
    store: &impl DocumentStore,
    session: &Session,
    id: &str,
) -> Result<(), ServiceError> {
    session.require(Role::Admin)?;
    if !store.delete_method(id)? {
        return Err(ServiceError::not_found("Communication method", id));
    }
    log::info!("Deleted communication method {}", id);
    Ok(())
}

/// The default channel set, in the order outreach usually escalates.
pub fn default_methods() -> Vec<MethodForm> {
    [
        ("LinkedIn Post", "Post on the company's LinkedIn page", 1, false),
        ("LinkedIn Message", "Direct message on LinkedIn", 2, false),
        ("Email", "Email to the company's contacts", 3, true),
        ("Phone Call", "Call one of the company's numbers", 4, false),
        ("Other", "Anything else worth logging", 5, false),
    ]
    .into_iter()
    .map(|(name, description, sequence, mandatory)| MethodForm {
        name: name.to_string(),
        description: description.to_string(),
        sequence,
        mandatory,
    })
    .collect()
}

/// Add the default channels when none are configured. Returns how many were added.
pub fn seed_default_methods(
    store: &impl DocumentStore,
    session: &Session,
) -> Result<usize, ServiceError> {
    session.require(Role::Admin)?;
    if !store.list_methods()?.is_empty() {
        return Ok(0);
    }
    let defaults = default_methods();
    for form in &defaults {
        add_method(store, session, form)?;
    }
    Ok(defaults.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;

    fn admin() -> Session {
        Session {
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        }
    }

    fn form(name: &str, sequence: i64) -> MethodForm {
        MethodForm {
            name: name.to_string(),
            description: format!("{name} outreach"),
            sequence,
            mandatory: false,
        }
    }

    #[test]
    fn test_add_and_list_in_sequence_order() {
        let db = test_db();
        add_method(&db, &admin(), &form("Email", 2)).unwrap();
        add_method(&db, &admin(), &form("Visit", 1)).unwrap();
        add_method(&db, &admin(), &form("Call", 2)).unwrap();

        let names: Vec<String> = list_methods(&db).unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Visit", "Email", "Call"]);
        assert_eq!(next_sequence(&db).unwrap(), 4);
    }

    #[test]
    fn test_sequence_after_saturates() {
        assert_eq!(sequence_after(0), 1);
        assert_eq!(sequence_after(u32::MAX as usize - 1), u32::MAX);
        assert_eq!(sequence_after(usize::MAX), u32::MAX);
    }

    #[test]
    fn test_sequence_must_be_positive() {
        let db = test_db();
        for bad in [0, -4, i64::from(u32::MAX) + 1] {
            match add_method(&db, &admin(), &form("Email", bad)) {
                Err(ServiceError::Validation(v)) => assert_eq!(v.field, "sequence"),
                other => panic!("expected sequence error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_description_is_required() {
        let db = test_db();
        let mut f = form("Email", 1);
        f.description = "  ".to_string();
        let err = add_method(&db, &admin(), &f).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref v) if v.field == "description"));
    }

    #[test]
    fn test_users_cannot_add_or_delete() {
        let db = test_db();
        let user = Session {
            email: "rep@example.com".to_string(),
            role: Role::User,
        };
        assert!(add_method(&db, &user, &form("Email", 1)).is_err());
        let m = add_method(&db, &admin(), &form("Email", 1)).unwrap();
        assert!(delete_method(&db, &user, &m.id).is_err());
        assert_eq!(list_methods(&db).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let db = test_db();
        assert!(matches!(
            delete_method(&db, &admin(), "ghost"),
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_seed_only_when_empty() {
        let db = test_db();
        assert_eq!(seed_default_methods(&db, &admin()).unwrap(), 5);
        assert_eq!(seed_default_methods(&db, &admin()).unwrap(), 0);
        let methods = list_methods(&db).unwrap();
        assert_eq!(methods[0].name, "LinkedIn Post");
        assert!(methods.iter().any(|m| m.mandatory));
    }
}
