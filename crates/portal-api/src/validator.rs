//! Credential checks. Both read the store and nothing else.

use anyhow::Result;

use portal_db::Database;

/// True iff a user has exactly this username and password. Comparison is
/// case-sensitive and against the stored plaintext.
pub fn is_valid_login(db: &Database, username: &str, password: &str) -> Result<bool> {
    Ok(db
        .find_user_by_username_and_password(username, password)?
        .is_some())
}

/// True iff neither the username nor the email is taken yet.
pub fn is_valid_registration(db: &Database, username: &str, email: &str) -> Result<bool> {
    if db.find_user_by_username(username)?.is_some() {
        return Ok(false);
    }
    Ok(db.find_user_by_email(email)?.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.reset_and_seed().unwrap();
        db
    }

    #[test]
    fn login_requires_exact_pair() {
        let db = seeded();
        assert!(is_valid_login(&db, "admin", "root").unwrap());
        assert!(is_valid_login(&db, "guest2", "guest2").unwrap());

        assert!(!is_valid_login(&db, "admin", "guest1").unwrap());
        assert!(!is_valid_login(&db, "ADMIN", "root").unwrap());
        assert!(!is_valid_login(&db, "admin", "root ").unwrap());
        assert!(!is_valid_login(&db, "nobody", "root").unwrap());
        assert!(!is_valid_login(&db, "", "").unwrap());
    }

    #[test]
    fn registration_rejects_taken_username_or_email() {
        let db = seeded();
        assert!(is_valid_registration(&db, "alice", "a@x.com").unwrap());

        assert!(!is_valid_registration(&db, "admin", "fresh@x.com").unwrap());
        assert!(!is_valid_registration(&db, "fresh", "guest3@example.com").unwrap());
        assert!(!is_valid_registration(&db, "guest1", "guest2@example.com").unwrap());
    }
}
