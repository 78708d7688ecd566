// rest/mod.rs — Public REST API server.
//
// Axum HTTP server consumed by the Garage web frontend.
//
// Endpoints:
//   GET  /api/v1/health
//   GET  /api/v1/maintenance/schedule
//   POST /api/v1/maintenance/plan
//   GET  /api/v1/vin/{vin}

pub mod routes;

use anyhow::Result;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::AppContext;

pub async fn serve(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let cors = cors_layer(&ctx.config.cors_allowed_origins);
    Router::new()
        .route("/api/v1/health", get(routes::health::health))
        .route(
            "/api/v1/maintenance/schedule",
            get(routes::maintenance::get_schedule),
        )
        .route("/api/v1/maintenance/plan", post(routes::maintenance::plan))
        .route("/api/v1/vin/{vin}", get(routes::vin::decode_vin))
        .layer(cors)
        .with_state(ctx)
}

/// Build the CORS layer from the configured origin allowlist.
///
/// An empty allowlist means any origin — the API is public and read-only.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
