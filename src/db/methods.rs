use chrono::Utc;
use rusqlite::params;

use super::*;
use crate::types::CommunicationMethod;

impl CommsDb {
    // =========================================================================
    // Communication methods
    // =========================================================================

    pub fn insert_method(&self, method: &CommunicationMethod) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO communication_methods (id, name, description, sequence, mandatory, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                method.id,
                method.name,
                method.description,
                method.sequence,
                method.mandatory as i32,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Returns `false` if no method matched.
    pub fn delete_method(&self, id: &str) -> Result<bool, DbError> {
        let rows = self
            .conn
            .execute("DELETE FROM communication_methods WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    /// All methods by `sequence`, ties in insertion order.
    pub fn get_methods(&self) -> Result<Vec<CommunicationMethod>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, sequence, mandatory
             FROM communication_methods
             ORDER BY sequence, rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CommunicationMethod {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                sequence: row.get(3)?,
                mandatory: row.get::<_, i32>(4)? != 0,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
