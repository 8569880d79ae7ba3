use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use std::path::Path;

use super::CredentialStore;
use crate::credentials::CanonicalCredentialRecord;
use crate::errors::StoreError;
use crate::logger::{self, LogTag};

/// SQLite-backed store using the `password_entries` table
pub struct SqliteCredentialStore {
    conn: Mutex<Connection>,
}

impl SqliteCredentialStore {
    /// Open (or create) a database file, creating parent directories as needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Backend(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        logger::debug(
            LogTag::Store,
            &format!("Opened credential database at {}", path.display()),
        );
        Self::with_connection(conn)
    }

    /// Fresh database that lives only as long as the store
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_tables()?;
        Ok(store)
    }

    fn initialize_tables(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS password_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                email TEXT,
                username TEXT,
                encrypted_password TEXT NOT NULL,
                url TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_password_entries_user_id ON password_entries(user_id)",
            [],
        )?;

        Ok(())
    }

    /// Number of rows stored for `owner`
    pub fn count_by_owner(&self, owner: &str) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM password_entries WHERE user_id = ?1",
            params![owner],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as usize)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<CanonicalCredentialRecord> {
    Ok(CanonicalCredentialRecord {
        owner: row.get(0)?,
        title: row.get(1)?,
        email: row.get(2)?,
        username: row.get(3)?,
        secret: row.get(4)?,
        url: row.get(5)?,
        notes: row.get(6)?,
    })
}

impl CredentialStore for SqliteCredentialStore {
    fn insert(&self, record: &CanonicalCredentialRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO password_entries
                (id, user_id, title, email, username, encrypted_password, url, notes,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                uuid::Uuid::new_v4().to_string(),
                record.owner,
                record.title,
                record.email,
                record.username,
                record.secret,
                record.url,
                record.notes,
                now,
                now
            ],
        )?;
        Ok(())
    }

    fn find_all_by_owner(&self, owner: &str) -> Result<Vec<CanonicalCredentialRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT user_id, title, email, username, encrypted_password, url, notes
             FROM password_entries WHERE user_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![owner], record_from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
