use anyhow::Result;
use tracing::info;

use crate::{Database, migrations, queries};

/// Demonstration accounts as (username, password, email): one admin and
/// four guests.
pub const SEED_USERS: &[(&str, &str, &str)] = &[
    ("admin", "root", "admin@example.com"),
    ("guest1", "guest1", "guest1@example.com"),
    ("guest2", "guest2", "guest2@example.com"),
    ("guest3", "guest3", "guest3@example.com"),
    ("guest4", "guest4", "guest4@example.com"),
];

impl Database {
    /// Drop all users and recreate the seed accounts in one transaction.
    /// Returns the number of accounts inserted.
    pub fn reset_and_seed(&self) -> Result<usize> {
        let inserted = self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            migrations::reset(&tx)?;
            for (username, password, email) in SEED_USERS {
                queries::insert_user(&tx, username, password, email)?;
            }
            tx.commit()?;
            Ok(SEED_USERS.len())
        })?;

        info!("Store reset, {} seed accounts created", inserted);
        Ok(inserted)
    }

    /// Insert whichever seed accounts are missing, keeping existing rows.
    pub fn seed(&self) -> Result<usize> {
        let inserted = self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut inserted = 0;
            for (username, password, email) in SEED_USERS {
                inserted += tx.execute(
                    "INSERT OR IGNORE INTO users (username, password, email) VALUES (?1, ?2, ?3)",
                    (username, password, email),
                )?;
            }
            tx.commit()?;
            Ok(inserted)
        })?;

        info!("{} seed accounts created", inserted);
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_and_seed_creates_admin_and_four_guests() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.reset_and_seed().unwrap(), 5);
        assert_eq!(db.count_users().unwrap(), 5);

        assert!(db.find_user_by_username_and_password("admin", "root").unwrap().is_some());
        for n in 1..=4 {
            let name = format!("guest{n}");
            let user = db.find_user_by_username_and_password(&name, &name).unwrap().unwrap();
            assert_eq!(user.email, format!("guest{n}@example.com"));
        }
    }

    #[test]
    fn reset_drops_registered_users() {
        let db = Database::open_in_memory().unwrap();
        db.reset_and_seed().unwrap();
        db.insert_user("alice", "p", "a@x.com").unwrap();
        assert_eq!(db.count_users().unwrap(), 6);

        db.reset_and_seed().unwrap();
        assert_eq!(db.count_users().unwrap(), 5);
        assert!(db.find_user_by_username("alice").unwrap().is_none());
    }

    #[test]
    fn seed_keeps_existing_rows_and_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user("alice", "p", "a@x.com").unwrap();

        assert_eq!(db.seed().unwrap(), 5);
        assert_eq!(db.seed().unwrap(), 0);
        assert_eq!(db.count_users().unwrap(), 6);
    }
}
