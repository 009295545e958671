use chrono::Utc;
use rusqlite::params;

use super::*;
use crate::types::Company;

impl CommsDb {
    // =========================================================================
    // Companies
    // =========================================================================

    /// Insert or update a company and replace its email and phone lists.
    ///
    /// The communication log is never touched here: an update keeps every
    /// logged event.
    pub fn upsert_company(&self, company: &Company) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO companies (
                id, name, location, linkedin, comments,
                periodicity_value, periodicity_unit, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                location = excluded.location,
                linkedin = excluded.linkedin,
                comments = excluded.comments,
                periodicity_value = excluded.periodicity_value,
                periodicity_unit = excluded.periodicity_unit,
                updated_at = excluded.updated_at",
            params![
                company.id,
                company.name,
                company.location,
                company.linkedin,
                company.comments,
                company.communication_periodicity.value,
                company.communication_periodicity.unit.as_str(),
                now,
            ],
        )?;

        self.conn.execute(
            "DELETE FROM company_emails WHERE company_id = ?1",
            params![company.id],
        )?;
        for (position, email) in company.emails.iter().enumerate() {
            self.conn.execute(
                "INSERT INTO company_emails (company_id, position, email) VALUES (?1, ?2, ?3)",
                params![company.id, position as i64, email],
            )?;
        }

        self.conn.execute(
            "DELETE FROM company_phones WHERE company_id = ?1",
            params![company.id],
        )?;
        for (position, phone) in company.phone_numbers.iter().enumerate() {
            self.conn.execute(
                "INSERT INTO company_phones (company_id, position, phone) VALUES (?1, ?2, ?3)",
                params![company.id, position as i64, phone],
            )?;
        }

        Ok(())
    }

    /// Get a company with its contact lists and full communication log.
    pub fn get_company(&self, id: &str) -> Result<Option<Company>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, location, linkedin, comments,
                    periodicity_value, periodicity_unit, created_at, updated_at
             FROM companies
             WHERE id = ?1",
        )?;

        let mut rows = stmt.query_map(params![id], Self::map_company_row)?;

        match rows.next() {
            Some(row) => Ok(Some(self.hydrate_company(row?)?)),
            None => Ok(None),
        }
    }

    pub fn company_exists(&self, id: &str) -> Result<bool, DbError> {
        let mut stmt = self.conn.prepare("SELECT 1 FROM companies WHERE id = ?1")?;
        Ok(stmt.exists(params![id])?)
    }

    /// Get all companies, ordered by name.
    pub fn get_all_companies(&self) -> Result<Vec<Company>, DbError> {
        let rows: Vec<DbCompany> = {
            let mut stmt = self.conn.prepare(
                "SELECT id, name, location, linkedin, comments,
                        periodicity_value, periodicity_unit, created_at, updated_at
                 FROM companies
                 ORDER BY name COLLATE NOCASE, created_at",
            )?;
            let mapped = stmt.query_map([], Self::map_company_row)?;
            mapped.collect::<Result<Vec<_>, _>>()?
        };

        rows.into_iter()
            .map(|row| self.hydrate_company(row))
            .collect()
    }

    /// Delete a company. Its contact lists and communication log go with it.
    /// Returns `false` if no company matched.
    pub fn delete_company(&self, id: &str) -> Result<bool, DbError> {
        let rows = self
            .conn
            .execute("DELETE FROM companies WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn hydrate_company(&self, row: DbCompany) -> Result<Company, DbError> {
        let emails = self.get_company_list("company_emails", "email", &row.id)?;
        let phones = self.get_company_list("company_phones", "phone", &row.id)?;
        let events = self
            .get_communications(&row.id)?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(row.into_company(self.default_unit, emails, phones, events))
    }

    fn get_company_list(
        &self,
        table: &str,
        column: &str,
        company_id: &str,
    ) -> Result<Vec<String>, DbError> {
        let sql = format!(
            "SELECT {column} FROM {table} WHERE company_id = ?1 ORDER BY position"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![company_id], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub(crate) fn map_company_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DbCompany> {
        Ok(DbCompany {
            id: row.get(0)?,
            name: row.get(1)?,
            location: row.get(2)?,
            linkedin: row.get(3)?,
            comments: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            periodicity_value: row.get(5)?,
            periodicity_unit: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}
