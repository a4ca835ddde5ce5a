use std::{error::Error, sync::Arc};

use axum::http::{header, HeaderValue, Method};
use tasklist_server::{app_state::AppState, data_access::data_context::DataContext, map_routes, settings::Settings};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = Settings::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    // ── Storage ────────────────────────────────────────────────
    let data_context = DataContext::new(&settings.database_path)?;
    tracing::info!(path = %settings.database_path, "database opened");

    // ── Router ─────────────────────────────────────────────────
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_str(&settings.frontend_url)?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let address = settings.socket_address();
    let app_state = Arc::new(AppState { data_context, settings });
    let app = map_routes(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── Start ──────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
