use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::debug;

use crate::session::SessionData;

/// Username of the caller, inserted by `require_login`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

/// Let the request through only when the session carries a username;
/// otherwise send the caller to the login page with the requested URL in
/// `next`.
pub async fn require_login(jar: SignedCookieJar, mut req: Request, next: Next) -> Response {
    let session = SessionData::load(&jar);

    match session.username() {
        Some(username) => {
            req.extensions_mut().insert(CurrentUser(username.to_string()));
            next.run(req).await
        }
        None => {
            let target = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            debug!("unauthenticated request for {}, redirecting to login", target);
            login_redirect(target).into_response()
        }
    }
}

pub fn login_redirect(next: &str) -> Redirect {
    Redirect::to(&format!("/login?next={}", urlencoding::encode(next)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn next_parameter_is_url_encoded() {
        let response = login_redirect("/panel?tab=a b").into_response();
        assert_eq!(
            response.headers()[LOCATION],
            "/login?next=%2Fpanel%3Ftab%3Da%20b"
        );
    }
}
