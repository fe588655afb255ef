use crate::Database;
use crate::models::UserRow;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, Row};

#[derive(Debug, thiserror::Error)]
pub enum InsertUserError {
    /// The store already holds a user with this username or email. Carries
    /// the offending column when SQLite names it.
    #[error("constraint violation on users.{0}")]
    ConstraintViolation(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for InsertUserError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
                let column = msg
                    .as_deref()
                    .and_then(|m| m.rsplit_once("users."))
                    .map(|(_, col)| col.to_string())
                    .unwrap_or_default();
                Self::ConstraintViolation(column)
            }
            _ => Self::Storage(err.into()),
        }
    }
}

const USER_COLUMNS: &str = "id, username, password, email";

impl Database {
    /// Insert a new user. Uniqueness of username and email is left to the
    /// table constraints, so two racing inserts cannot both succeed.
    pub fn insert_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> std::result::Result<UserRow, InsertUserError> {
        let conn = self.lock()?;
        insert_user(&conn, username, password, email)
    }

    pub fn find_user_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            query_user(
                conn,
                "username = ?1 AND password = ?2",
                &[&username, &password],
            )
        })
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", &[&username]))
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email = ?1", &[&email]))
    }

    pub fn count_users(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let n = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(n)
        })
    }
}

pub(crate) fn insert_user(
    conn: &Connection,
    username: &str,
    password: &str,
    email: &str,
) -> std::result::Result<UserRow, InsertUserError> {
    conn.execute(
        "INSERT INTO users (username, password, email) VALUES (?1, ?2, ?3)",
        (username, password, email),
    )?;

    Ok(UserRow {
        id: conn.last_insert_rowid(),
        username: username.to_string(),
        password: password.to_string(),
        email: email.to_string(),
    })
}

fn query_user(
    conn: &Connection,
    filter: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {filter} LIMIT 1");
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt.query_row(params, user_from_row).optional()?;

    Ok(row)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        email: row.get(3)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
