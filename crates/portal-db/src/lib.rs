pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

pub use queries::InsertUserError;

/// Path that selects a private in-memory database instead of a file.
pub const IN_MEMORY: &str = ":memory:";

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if path.as_os_str() == IN_MEMORY {
            return Self::open_in_memory();
        }

        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!("journal_mode = {}", mode);

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;

        info!("In-memory database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Like `with_conn`, but hands out `&mut` so the closure can open a
    /// transaction.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.lock()?;
        f(&mut conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_path_opens_an_empty_private_store() {
        let a = Database::open(Path::new(IN_MEMORY)).unwrap();
        let b = Database::open(Path::new(IN_MEMORY)).unwrap();
        assert_eq!(a.count_users().unwrap(), 0);

        a.insert_user("alice", "p", "a@x.com").unwrap();
        assert_eq!(a.count_users().unwrap(), 1);
        assert_eq!(b.count_users().unwrap(), 0);
    }

    #[test]
    fn file_store_is_reset_on_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portal.db");

        {
            let db = Database::open(&path).unwrap();
            db.reset_and_seed().unwrap();
            db.insert_user("alice", "p", "a@x.com").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert!(db.find_user_by_username("alice").unwrap().is_some());

        assert_eq!(db.reset_and_seed().unwrap(), 5);
        assert!(db.find_user_by_username("alice").unwrap().is_none());
        assert_eq!(db.count_users().unwrap(), 5);
    }

    #[test]
    fn file_store_keeps_users_when_only_seeding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portal.db");

        {
            let db = Database::open(&path).unwrap();
            assert_eq!(db.seed().unwrap(), 5);
            db.insert_user("alice", "p", "a@x.com").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.seed().unwrap(), 0);
        assert!(db.find_user_by_username_and_password("alice", "p").unwrap().is_some());
        assert_eq!(db.count_users().unwrap(), 6);
    }
}
