use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bookmark_metadata::config::Config;
use bookmark_metadata::metadata::{FetchLimits, MetadataExtractor};
use bookmark_metadata::router;
use bookmark_metadata::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // JSON logs in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bookmark_metadata=info,tower_http=info"));

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Bookmark metadata service starting...");

    let config = Config::from_env()?;
    info!("Configuration loaded");

    let extractor = MetadataExtractor::new(FetchLimits::default(), &config.favicon_proxy_url)?;

    let cors = if config.is_dev {
        info!("CORS: permissive (dev mode)");
        CorsLayer::permissive()
    } else {
        tracing::warn!("CORS: restrictive (production mode)");
        CorsLayer::new()
    };

    let addr = config.server_addr();

    let app_state = AppState {
        jwt_secret: Arc::from(config.jwt_secret.as_str()),
        extractor,
    };

    let app = router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
