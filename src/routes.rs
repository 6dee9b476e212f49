// src/routes.rs

use axum::{Router, http::Method, middleware, routing::get};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers::leaderboard, state::AppState, utils::jwt::session_middleware};

/// Assembles the main application router.
///
/// * Leaderboard routes resolve the caller's session from the bearer token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origin = state.config.public_origin.clone();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |value, _| {
            value.as_bytes() == origin.as_bytes()
        }))
        .allow_methods([Method::GET])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let leaderboard_routes = Router::new()
        .route("/", get(leaderboard::get_leaderboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .route("/share", get(leaderboard::get_share_message));

    Router::new()
        .nest("/api/leaderboard", leaderboard_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
