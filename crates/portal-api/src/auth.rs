use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use tracing::{debug, info};

use portal_db::Database;
use portal_types::forms::{LoginForm, LoginQuery};

use crate::config::Config;
use crate::pages::render_page;
use crate::session::{self, SessionData};
use crate::{internal_error, validator, views, with_db};

pub const WRONG_CREDENTIALS: &str = "wrong username or password";
pub const LOGGED_OUT: &str = "You have been logged out.";

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    key: Key,
}

impl AppState {
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db: Arc::new(db),
            key: session::signing_key(&config.secret_key),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

pub async fn login_form(jar: SignedCookieJar, Query(query): Query<LoginQuery>) -> impl IntoResponse {
    if let Some(next) = &query.next {
        debug!("login page requested with next={}", next);
    }
    render_page(jar, |flashes, _| views::login(flashes, None))
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, StatusCode> {
    let username = form.username.clone();
    let password = form.password;
    let valid = with_db(&state, move |db| validator::is_valid_login(db, &username, &password))
        .await?
        .map_err(internal_error)?;

    if !valid {
        info!(username = %form.username, "login failed");
        let page = render_page(jar, |flashes, _| views::login(flashes, Some(WRONG_CREDENTIALS)));
        return Ok(page.into_response());
    }

    info!(username = %form.username, "login succeeded");
    let mut session = SessionData::load(&jar);
    session.username = Some(form.username);
    Ok((session.save(jar), Redirect::to("/panel")).into_response())
}

pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    let mut session = SessionData::load(&jar);
    if let Some(username) = session.username.take() {
        info!(username = %username, "logged out");
    }
    session.flash("success", LOGGED_OUT);
    (session.save(jar), Redirect::to("/"))
}
