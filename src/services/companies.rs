// Companies service: admin roster management.
// Validates the company form and writes through the document store.

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ValidationError};
use crate::session::{Role, Session};
use crate::store::DocumentStore;
use crate::types::{Company, Periodicity, PeriodicityUnit};

use super::split_list;

/// Raw company form input. Emails and phone numbers are comma separated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForm {
    pub name: String,
    pub location: String,
    pub linkedin: String,
    pub emails: String,
    pub phone_numbers: String,
    #[serde(default)]
    pub comments: String,
    pub communication_periodicity: f64,
    #[serde(default)]
    pub periodicity_unit: PeriodicityUnit,
}

impl CompanyForm {
    /// Pre-fill the edit form from a stored company.
    pub fn from_company(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            location: company.location.clone(),
            linkedin: company.linkedin.clone(),
            emails: company.emails.join(", "),
            phone_numbers: company.phone_numbers.join(", "),
            comments: company.comments.clone(),
            communication_periodicity: company.communication_periodicity.value,
            periodicity_unit: company.communication_periodicity.unit,
        }
    }
}

/// Validated form contents, ready to become a record.
struct ValidCompany {
    name: String,
    location: String,
    linkedin: String,
    emails: Vec<String>,
    phone_numbers: Vec<String>,
    comments: String,
    periodicity: Periodicity,
}

fn validate(form: &CompanyForm) -> Result<ValidCompany, ValidationError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }
    let location = form.location.trim();
    if location.is_empty() {
        return Err(ValidationError::required("location"));
    }

    let linkedin = form.linkedin.trim();
    if linkedin.is_empty() {
        return Err(ValidationError::required("linkedin"));
    }
    match url::Url::parse(linkedin) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.host().is_some() => {}
        _ => return Err(ValidationError::new("linkedin", "Invalid URL format")),
    }

    let emails = split_list(&form.emails);
    if emails.is_empty() {
        return Err(ValidationError::required("emails"));
    }
    let phone_numbers = split_list(&form.phone_numbers);
    if phone_numbers.is_empty() {
        return Err(ValidationError::required("phoneNumbers"));
    }

    let periodicity = Periodicity {
        value: form.communication_periodicity,
        unit: form.periodicity_unit,
    };
    let days = periodicity.to_days();
    if !(days.is_finite() && days > 0.0) {
        return Err(ValidationError::new(
            "communicationPeriodicity",
            "must be a positive number",
        ));
    }

    Ok(ValidCompany {
        name: name.to_string(),
        location: location.to_string(),
        linkedin: linkedin.to_string(),
        emails,
        phone_numbers,
        comments: form.comments.trim().to_string(),
        periodicity,
    })
}

pub fn list_companies(
    store: &impl DocumentStore,
    session: &Session,
) -> Result<Vec<Company>, ServiceError> {
    session.require(Role::Admin)?;
    Ok(store.list_companies()?)
}

pub fn get_company(
    store: &impl DocumentStore,
    session: &Session,
    id: &str,
) -> Result<Company, ServiceError> {
    session.require(Role::Admin)?;
    store
        .get_company(id)?
        .ok_or_else(|| ServiceError::not_found("Company", id))
}

pub fn create_company(
    store: &impl DocumentStore,
    session: &Session,
    form: &CompanyForm,
) -> Result<Company, ServiceError> {
    session.require(Role::Admin)?;
    let valid = validate(form)?;

    let company = Company {
        id: uuid::Uuid::new_v4().to_string(),
        name: valid.name,
        location: valid.location,
        linkedin: valid.linkedin,
        emails: valid.emails,
        phone_numbers: valid.phone_numbers,
        comments: valid.comments,
        communication_periodicity: valid.periodicity,
        communication_dates: Vec::new(),
    };

    store.save_company(&company)?;
    log::info!("Created company {} ({})", company.name, company.id);
    Ok(company)
}

/// Replace a company's profile. Its communication log is kept as is.
pub fn update_company(
    store: &impl DocumentStore,
    session: &Session,
    id: &str,
    form: &CompanyForm,
) -> Result<Company, ServiceError> {
    session.require(Role::Admin)?;
    let valid = validate(form)?;
    let existing = store
        .get_company(id)?
        .ok_or_else(|| ServiceError::not_found("Company", id))?;

    let company = Company {
        id: existing.id,
        name: valid.name,
        location: valid.location,
        linkedin: valid.linkedin,
        emails: valid.emails,
        phone_numbers: valid.phone_numbers,
        comments: valid.comments,
        communication_periodicity: valid.periodicity,
        communication_dates: existing.communication_dates,
    };

    store.save_company(&company)?;
    log::info!("Updated company {} ({})", company.name, company.id);
    Ok(company)
}

pub fn delete_company(
    store: &impl DocumentStore,
    session: &Session,
    id: &str,
) -> Result<(), ServiceError> {
    session.require(Role::Admin)?;
    if !store.delete_company(id)? {
        return Err(ServiceError::not_found("Company", id));
    }
    log::info!("Deleted company {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use crate::types::CommunicationEvent;

    fn admin() -> Session {
        Session {
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        }
    }

    fn user() -> Session {
        Session {
            email: "rep@example.com".to_string(),
            role: Role::User,
        }
    }

    fn form() -> CompanyForm {
        CompanyForm {
            name: "  Acme  ".to_string(),
            location: "Berlin".to_string(),
            linkedin: "https://www.linkedin.com/company/acme".to_string(),
            emails: "hello@acme.test, sales@acme.test".to_string(),
            phone_numbers: "+49 30 1234".to_string(),
            comments: "Met at expo".to_string(),
            communication_periodicity: 2.0,
            periodicity_unit: PeriodicityUnit::Weeks,
        }
    }

    #[test]
    fn test_create_company_normalizes_form() {
        let db = test_db();
        let company = create_company(&db, &admin(), &form()).unwrap();
        assert_eq!(company.name, "Acme");
        assert_eq!(company.emails.len(), 2);
        assert_eq!(company.communication_periodicity, Periodicity::weeks(2.0));

        let stored = get_company(&db, &admin(), &company.id).unwrap();
        assert_eq!(stored, company);
    }

    #[test]
    fn test_users_cannot_manage_companies() {
        let db = test_db();
        let err = create_company(&db, &user(), &form()).unwrap_err();
        assert!(matches!(err, ServiceError::Access(_)));
        assert!(list_companies(&db, &user()).is_err());
    }

    #[test]
    fn test_required_fields() {
        let db = test_db();
        let cases: Vec<(&str, Box<dyn Fn(&mut CompanyForm)>)> = vec![
            ("name", Box::new(|f| f.name = " ".to_string())),
            ("location", Box::new(|f| f.location.clear())),
            ("linkedin", Box::new(|f| f.linkedin.clear())),
            ("emails", Box::new(|f| f.emails = " , ".to_string())),
            ("phoneNumbers", Box::new(|f| f.phone_numbers.clear())),
        ];
        for (field, mutate) in cases {
            let mut f = form();
            mutate(&mut f);
            match create_company(&db, &admin(), &f) {
                Err(ServiceError::Validation(v)) => assert_eq!(v.field, field),
                other => panic!("expected validation error on {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_linkedin_must_be_a_web_url() {
        let db = test_db();
        for bad in ["linkedin.com/acme", "ftp://linkedin.com/acme", "not a url"] {
            let mut f = form();
            f.linkedin = bad.to_string();
            let err = create_company(&db, &admin(), &f).unwrap_err();
            assert!(matches!(err, ServiceError::Validation(ref v) if v.field == "linkedin"));
        }
    }

    #[test]
    fn test_periodicity_must_be_positive() {
        let db = test_db();
        for bad in [0.0, -1.0, f64::NAN] {
            let mut f = form();
            f.communication_periodicity = bad;
            assert!(create_company(&db, &admin(), &f).is_err());
        }
    }

    #[test]
    fn test_periodicity_must_stay_finite_in_days() {
        let db = test_db();
        let mut f = form();
        f.communication_periodicity = 1e308;
        f.periodicity_unit = PeriodicityUnit::Weeks;
        let err = create_company(&db, &admin(), &f).unwrap_err();
        assert!(
            matches!(err, ServiceError::Validation(ref v) if v.field == "communicationPeriodicity")
        );
        assert!(list_companies(&db, &admin()).unwrap().is_empty());
    }

    #[test]
    fn test_update_keeps_log_and_id() {
        let db = test_db();
        let company = create_company(&db, &admin(), &form()).unwrap();
        db.append_communication(&company.id, &CommunicationEvent::new("Email", "2024-01-09"))
            .unwrap();

        let mut f = CompanyForm::from_company(&company);
        f.location = "Munich".to_string();
        f.periodicity_unit = PeriodicityUnit::Days;
        let updated = update_company(&db, &admin(), &company.id, &f).unwrap();

        assert_eq!(updated.id, company.id);
        assert_eq!(updated.location, "Munich");
        assert_eq!(updated.communication_periodicity, Periodicity::days(2.0));
        assert_eq!(updated.communication_dates.len(), 1);
    }

    #[test]
    fn test_update_unknown_company_is_not_found() {
        let db = test_db();
        let err = update_company(&db, &admin(), "ghost", &form()).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[test]
    fn test_delete_company() {
        let db = test_db();
        let company = create_company(&db, &admin(), &form()).unwrap();
        delete_company(&db, &admin(), &company.id).unwrap();
        assert!(matches!(
            delete_company(&db, &admin(), &company.id),
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_edit_form_prefill_joins_lists() {
        let db = test_db();
        let company = create_company(&db, &admin(), &form()).unwrap();
        let f = CompanyForm::from_company(&company);
        assert_eq!(f.emails, "hello@acme.test, sales@acme.test");
        assert_eq!(f.periodicity_unit, PeriodicityUnit::Weeks);
    }
}
