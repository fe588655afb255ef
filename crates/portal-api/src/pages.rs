use axum::{
    Extension,
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::warn;

use portal_db::models::UserRow;
use portal_types::models::User;

use crate::auth::AppState;
use crate::middleware::{CurrentUser, login_redirect};
use crate::session::{Flash, SessionData};
use crate::{internal_error, views, with_db};

/// Render a page, consuming any pending notices. The closure also sees the
/// current username.
pub(crate) fn render_page<F>(jar: SignedCookieJar, render: F) -> (SignedCookieJar, Html<String>)
where
    F: FnOnce(&[Flash], Option<&str>) -> String,
{
    let mut session = SessionData::load(&jar);
    let flashes = session.take_flashes();
    let html = render(flashes.as_slice(), session.username());
    (session.save(jar), Html(html))
}

pub async fn index(jar: SignedCookieJar) -> impl IntoResponse {
    render_page(jar, views::index)
}

pub async fn panel(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    uri: Uri,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
) -> Result<Response, StatusCode> {
    let lookup = username.clone();
    let row = with_db(&state, move |db| db.find_user_by_username(&lookup))
        .await?
        .map_err(internal_error)?;

    let Some(row) = row else {
        // Session outlived its account, e.g. the store was reset.
        warn!(username = %username, "session names an unknown user, clearing it");
        let mut session = SessionData::load(&jar);
        session.username = None;
        let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/panel");
        return Ok((session.save(jar), login_redirect(target)).into_response());
    };

    let user = to_view(row);
    Ok(render_page(jar, |flashes, _| views::panel(flashes, &user, &username)).into_response())
}

fn to_view(row: UserRow) -> User {
    User {
        id: row.id,
        username: row.username,
        email: row.email,
    }
}
