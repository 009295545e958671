//! Document-store seam between the services and persistence.
//!
//! Services only see this trait, so the SQLite store can be swapped for a
//! remote document database client without touching business logic.

use crate::db::{CommsDb, DbError};
use crate::types::{Company, CommunicationEvent, CommunicationMethod};

pub trait DocumentStore {
    fn list_companies(&self) -> Result<Vec<Company>, DbError>;

    fn get_company(&self, id: &str) -> Result<Option<Company>, DbError>;

    /// Create or replace a company record. Must not drop logged events.
    fn save_company(&self, company: &Company) -> Result<(), DbError>;

    /// Returns `false` when nothing was deleted.
    fn delete_company(&self, id: &str) -> Result<bool, DbError>;

    fn list_methods(&self) -> Result<Vec<CommunicationMethod>, DbError>;

    fn add_method(&self, method: &CommunicationMethod) -> Result<(), DbError>;

    fn delete_method(&self, id: &str) -> Result<bool, DbError>;

    /// Append one event to each listed company, all or nothing. Returns
    /// `Ok(false)` without writing if any company is missing.
    fn append_communications(
        &self,
        company_ids: &[String],
        event: &CommunicationEvent,
    ) -> Result<bool, DbError>;
}

impl DocumentStore for CommsDb {
    fn list_companies(&self) -> Result<Vec<Company>, DbError> {
        self.get_all_companies()
    }

    fn get_company(&self, id: &str) -> Result<Option<Company>, DbError> {
        CommsDb::get_company(self, id)
    }

    fn save_company(&self, company: &Company) -> Result<(), DbError> {
        self.with_transaction(|tx| tx.upsert_company(company))
    }

    fn delete_company(&self, id: &str) -> Result<bool, DbError> {
        CommsDb::delete_company(self, id)
    }

    fn list_methods(&self) -> Result<Vec<CommunicationMethod>, DbError> {
        self.get_methods()
    }

    fn add_method(&self, method: &CommunicationMethod) -> Result<(), DbError> {
        self.insert_method(method)
    }

    fn delete_method(&self, id: &str) -> Result<bool, DbError> {
        CommsDb::delete_method(self, id)
    }

    fn append_communications(
        &self,
        company_ids: &[String],
        event: &CommunicationEvent,
    ) -> Result<bool, DbError> {
        self.with_transaction(|tx| {
            for id in company_ids {
                if !tx.company_exists(id)? {
                    return Ok(false);
                }
            }
            for id in company_ids {
                tx.append_communication(id, event)?;
            }
            Ok(true)
        })
    }
}
