//! Credential store for user registration
//!
//! A single `users (username, password)` table in SQLite. Rows are inserted
//! verbatim: no hashing, no uniqueness check. One connection is opened and
//! closed per registration.

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use crate::error::Result;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    username TEXT,
    password TEXT
)";

const INSERT_USER: &str = "INSERT INTO users (username, password) VALUES (?1, ?2)";

#[derive(Debug, Clone)]
pub struct CredentialStore {
    db_path: PathBuf,
}

impl CredentialStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute(CREATE_TABLE, [])?;
        Ok(conn)
    }

    /// Insert one credential row
    pub fn insert(&self, username: &str, password: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(INSERT_USER, params![username, password])?;
        tracing::info!("Registered user {:?}", username);
        Ok(())
    }

    /// Number of rows stored under a username
    pub fn count(&self, username: &str) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
