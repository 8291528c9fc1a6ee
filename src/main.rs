use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dashboard::api::router;
use dashboard::auth::GoogleTokenVerifier;
use dashboard::config::AppConfig;
use dashboard::db;
use dashboard::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "dashboard=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let pool = db::connect(&config.database_url, config.max_connections).await?;
    db::migrate(&pool).await?;

    let verifier = GoogleTokenVerifier::new(
        config.tokeninfo_url.clone(),
        config.google_client_id.clone(),
    )?;
    if config.google_client_id.is_none() {
        tracing::warn!("GOOGLE_CLIENT_ID is not set; token audience will not be checked");
    }

    let state = AppState {
        db: pool.clone(),
        verifier: Arc::new(verifier),
    };

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
