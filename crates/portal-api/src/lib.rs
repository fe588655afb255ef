pub mod auth;
pub mod config;
pub mod middleware;
pub mod pages;
pub mod register;
pub mod session;
pub mod validator;
pub mod views;


use axum::{Router, http::StatusCode, middleware::from_fn_with_state, routing::get};
use tower_http::trace::TraceLayer;
use tracing::error;

use portal_db::Database;

use crate::auth::AppState;
use crate::middleware::require_login;

/// Build the full application: public pages plus the guarded panel.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/panel", get(pages::panel))
        .route_layer(from_fn_with_state(state.clone(), require_login));

    Router::new()
        .route("/", get(pages::index))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/register", get(register::register_form).post(register::register))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run a blocking store call off the async runtime.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, StatusCode>
where
    F: FnOnce(&Database) -> T + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

pub(crate) fn internal_error(err: anyhow::Error) -> StatusCode {
    error!("storage error: {:#}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}
