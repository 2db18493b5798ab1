//! Route definitions for the CivicHub HTTP API.
//!
//! Every route is mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete router with its state applied.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(session_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let router = Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ));

    middleware::security::with_security_headers(router).with_state(state)
}

/// Login, token verification, logout.
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/verify", get(handlers::auth::verify))
        .route("/logout", post(handlers::auth::logout))
}

/// Account management. Every handler requires an admin token.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admins",
            get(handlers::account::list_admins).post(handlers::account::create_admin),
        )
        .route(
            "/admins/{id}",
            get(handlers::account::get_admin)
                .put(handlers::account::update_admin)
                .delete(handlers::account::delete_admin),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
