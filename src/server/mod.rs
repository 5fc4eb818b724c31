//! HTTP Front Door - minimal axum listener
//!
//! One informational route, no auth, no request validation. The storage
//! gateway is not wired to the HTTP surface.

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod routes;

pub fn router() -> Router {
    Router::new()
        .route("/api/forms/list", get(routes::list_forms))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn start_server(port: u16) -> anyhow::Result<()> {
    let app = router();

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on port: {}", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
