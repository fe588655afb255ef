use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{info, warn};

use portal_db::{Database, InsertUserError};
use portal_types::forms::RegisterForm;

use crate::auth::AppState;
use crate::pages::render_page;
use crate::session::SessionData;
use crate::{internal_error, validator, views, with_db};

pub const EMPTY_FIELDS: &str = "fields cannot be empty";
pub const PASSWORD_MISMATCH: &str = "passwords do not match";
pub const ALREADY_REGISTERED: &str = "username or email already registered";
pub const REGISTERED: &str = "Registration successful.";

#[derive(Debug, PartialEq, Eq)]
pub enum Registration {
    Created { id: i64 },
    Taken,
}

pub async fn register_form(jar: SignedCookieJar) -> impl IntoResponse {
    render_page(jar, |flashes, _| views::register(flashes, None))
}

pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, StatusCode> {
    // Checks run in this order and only the first failure is reported.
    let error = if form.has_empty_field() {
        EMPTY_FIELDS
    } else if !form.passwords_match() {
        PASSWORD_MISMATCH
    } else {
        let username = form.username.clone();
        let outcome = with_db(&state, move |db| register_user(db, &form))
            .await?
            .map_err(internal_error)?;

        match outcome {
            Registration::Created { id } => {
                info!(username = %username, id, "user registered");
                let mut session = SessionData::load(&jar);
                session.flash("success", REGISTERED);
                return Ok((session.save(jar), Redirect::to("/login")).into_response());
            }
            Registration::Taken => ALREADY_REGISTERED,
        }
    };

    let page = render_page(jar, |flashes, _| views::register(flashes, Some(error)));
    Ok(page.into_response())
}

/// Check availability, then insert. The pre-check gives the common case a
/// clean answer; the table constraints still decide when two registrations
/// race for the same name or email.
pub fn register_user(db: &Database, form: &RegisterForm) -> anyhow::Result<Registration> {
    if !validator::is_valid_registration(db, &form.username, &form.email)? {
        return Ok(Registration::Taken);
    }
    insert_account(db, form)
}

fn insert_account(db: &Database, form: &RegisterForm) -> anyhow::Result<Registration> {
    match db.insert_user(&form.username, &form.password1, &form.email) {
        Ok(row) => Ok(Registration::Created { id: row.id }),
        Err(InsertUserError::ConstraintViolation(column)) => {
            warn!(username = %form.username, column = %column, "registration lost a uniqueness race");
            Ok(Registration::Taken)
        }
        Err(InsertUserError::Storage(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str, password: &str) -> RegisterForm {
        RegisterForm {
            username: username.into(),
            email: email.into(),
            password1: password.into(),
            password2: password.into(),
        }
    }

    #[test]
    fn creates_user_with_submitted_fields() {
        let db = Database::open_in_memory().unwrap();
        let outcome = register_user(&db, &form("alice", "a@x.com", "p")).unwrap();
        assert!(matches!(outcome, Registration::Created { .. }));

        let row = db.find_user_by_username("alice").unwrap().unwrap();
        assert_eq!((row.password.as_str(), row.email.as_str()), ("p", "a@x.com"));
    }

    #[test]
    fn taken_username_or_email_is_refused() {
        let db = Database::open_in_memory().unwrap();
        register_user(&db, &form("alice", "a@x.com", "p")).unwrap();

        assert_eq!(register_user(&db, &form("alice", "b@x.com", "p")).unwrap(), Registration::Taken);
        assert_eq!(register_user(&db, &form("bob", "a@x.com", "p")).unwrap(), Registration::Taken);
        assert_eq!(db.count_users().unwrap(), 1);
    }

    #[test]
    fn constraint_violation_on_insert_counts_as_taken() {
        // Simulates losing a race: the row appears after the pre-check.
        let db = Database::open_in_memory().unwrap();
        db.insert_user("alice", "p", "a@x.com").unwrap();

        assert_eq!(insert_account(&db, &form("alice", "z@x.com", "q")).unwrap(), Registration::Taken);
        assert_eq!(insert_account(&db, &form("zed", "a@x.com", "q")).unwrap(), Registration::Taken);
        assert_eq!(db.count_users().unwrap(), 1);
    }
}
