//! SQLite-backed document store for companies, communication methods and the
//! communication log.
//!
//! The database lives at `~/.commtrack/commtrack.db` unless `dataDir` is set in
//! config. Communication rows are append-only; nothing in this module edits or
//! deletes an individual event (company deletion cascades).

use std::path::PathBuf;

use rusqlite::Connection;

use crate::types::{Config, PeriodicityUnit};

pub mod types;
pub use types::*;

pub mod communications;
pub mod companies;
pub mod methods;

const DB_FILE_NAME: &str = "commtrack.db";

pub struct CommsDb {
    conn: Connection,
    /// Unit applied to companies stored before periodicity carried one.
    default_unit: PeriodicityUnit,
}

impl CommsDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    pub fn set_default_unit(&mut self, unit: PeriodicityUnit) {
        self.default_unit = unit;
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    pub fn with_transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(DbError::from)?;
        match f(self) {
            Ok(val) => {
                self.conn.execute_batch("COMMIT").map_err(DbError::from)?;
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Open (or create) the database named by `config` and apply the schema.
    pub fn open(config: &Config) -> Result<Self, DbError> {
        let path = Self::db_path(config)?;
        let mut db = Self::open_at(path)?;
        db.set_default_unit(config.default_periodicity_unit);
        Ok(db)
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // WAL for concurrent readers while a writer appends
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        log::debug!("Opened database at {}", path.display());

        Ok(Self {
            conn,
            default_unit: PeriodicityUnit::default(),
        })
    }

    /// Resolve the database path: `<dataDir>/commtrack.db`, falling back to
    /// `~/.commtrack/commtrack.db`.
    pub fn db_path(config: &Config) -> Result<PathBuf, DbError> {
        if let Some(dir) = config.data_dir.as_deref().filter(|d| !d.trim().is_empty()) {
            return Ok(PathBuf::from(dir).join(DB_FILE_NAME));
        }
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".commtrack").join(DB_FILE_NAME))
    }
}
