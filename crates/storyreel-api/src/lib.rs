//! storyreel: HTTP facade.
//!
//! Exposes one `Reader` over JSON. Route handlers translate requests into
//! reader commands; a background task advances branch playback.

use axum::Router;

pub mod audio;
pub mod config;
pub mod error;
pub mod playback;
pub mod routes;
pub mod state;

/// Builds the full router. `main.rs` adds the tower-http layers on top.
pub fn build_router(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/pages", routes::pages::router())
        .nest("/api/v1/reader", routes::reader::router())
        .with_state(state)
}
