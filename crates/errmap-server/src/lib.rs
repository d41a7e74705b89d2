pub mod error;
pub mod products;
pub mod routes;
pub mod state;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{AppState, ServerConfig};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        // Error catalog
        .route("/api/errors", get(routes::catalog::list_errors))
        // Products
        .route(
            "/api/products",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route(
            "/api/products/{id}",
            get(routes::products::get_product).delete(routes::products::delete_product),
        )
        .route(
            "/api/products/{id}/reserve",
            post(routes::products::reserve_product),
        )
        .layer(middleware::from_fn_with_state(
            app_state.mapper.clone(),
            error::render_errors,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Bind `0.0.0.0:port` and serve until the process exits. `port = 0` lets
/// the OS pick; the chosen port is logged.
pub async fn serve(config: ServerConfig, port: u16) -> anyhow::Result<()> {
    let app = build_router(AppState::new(config)?);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    let actual_port = listener.local_addr()?.port();

    tracing::info!(
        hide_details = config.policy.hide_details,
        op_timeout_ms = config.op_timeout.as_millis() as u64,
        "errmap server listening on http://localhost:{actual_port}"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
