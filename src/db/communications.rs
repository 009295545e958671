use chrono::Utc;
use rusqlite::params;

use super::*;
use crate::types::CommunicationEvent;

impl CommsDb {
    // =========================================================================
    // Communication log (append-only)
    // =========================================================================

    /// Append one event to a company's log. Returns the new row id.
    pub fn append_communication(
        &self,
        company_id: &str,
        event: &CommunicationEvent,
    ) -> Result<i64, DbError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO communications (company_id, kind, date, notes, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![company_id, event.kind, event.date, event.notes, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// A company's log in insertion order.
    pub fn get_communications(&self, company_id: &str) -> Result<Vec<DbCommunication>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, company_id, kind, date, notes, logged_at
             FROM communications
             WHERE company_id = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![company_id], |row| {
            Ok(DbCommunication {
                id: row.get(0)?,
                company_id: row.get(1)?,
                kind: row.get(2)?,
                date: row.get(3)?,
                notes: row.get(4)?,
                logged_at: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
