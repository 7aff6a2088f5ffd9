//! storyreel reader server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use storyreel_api::audio::TracingAudioPlayer;
use storyreel_api::config::ServerConfig;
use storyreel_api::error::AppError;
use storyreel_api::playback::spawn_playback_driver;
use storyreel_api::state::AppState;
use storyreel_core::audio::AudioPlayer;
use storyreel_core::clock::{Clock, SystemClock};
use storyreel_graph::application::builtin::forest_catalog;
use storyreel_graph::application::catalog::{CatalogProvider, FileCatalog, load_graph};
use storyreel_narrative::application::reader::Reader;
use storyreel_session::domain::state::StateDefaults;
use storyreel_store::sqlite_store::SqliteKeyValueStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting storyreel reader server");

    let config = ServerConfig::from_env()?;

    // Load and check the page graph.
    let catalog: Box<dyn CatalogProvider> = match &config.catalog_path {
        Some(path) => Box::new(FileCatalog::new(path.clone())),
        None => Box::new(forest_catalog()?),
    };
    let report = load_graph(catalog.as_ref())?;
    if config.strict_catalog && report.has_integrity_errors() {
        return Err(AppError::Config(format!(
            "catalog has {} integrity issue(s) and STRICT_CATALOG is set",
            report.issues.len()
        ))
        .into());
    }
    let graph = Arc::new(report.graph);

    // Restore reader state.
    let kv = SqliteKeyValueStore::connect(&config.database_url).await?;
    let defaults = StateDefaults::for_graph(&graph).with_counter(config.counter_default);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut reader = Reader::open(
        Arc::new(kv),
        graph,
        defaults,
        config.viewport,
        config.timing,
        Arc::clone(&clock),
    )
    .await?;

    let audio: Arc<dyn AudioPlayer> = Arc::new(TracingAudioPlayer);
    let jump = reader.mount(audio.as_ref()).await;
    tracing::info!(page = %jump.page, "reader restored");

    // Build application state and start playback.
    let app_state = AppState::new(reader, audio, clock);
    let _driver = spawn_playback_driver(app_state.clone());

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = storyreel_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(AppError::from)?;

    axum::serve(listener, app).await.map_err(AppError::from)?;

    Ok(())
}
