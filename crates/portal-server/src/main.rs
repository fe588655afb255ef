use tracing::{info, warn};

use portal_api::auth::AppState;
use portal_api::config::Config;
use portal_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "portal=debug,portal_api=debug,portal_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;
    if config.uses_default_secret() {
        warn!("Using the built-in session secret; set PORTAL_SECRET_KEY to override it");
    }

    // Init database, seeded once before serving
    let db = Database::open(&config.db_path)?;
    if config.reset_on_start {
        db.reset_and_seed()?;
    } else {
        db.seed()?;
    }

    let addr = config.addr()?;
    let app = portal_api::router(AppState::new(db, &config));

    info!("Portal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
