//! API routes

use crate::api::handlers::{create_user, get_me, health_check, update_me, AppState};
use crate::auth::handlers::create_token;
use crate::auth::middleware::authenticate;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Build the API routes
///
/// Every user route is registered both with and without the trailing slash.
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/user/create/", post(create_user))
        .route("/api/user/create", post(create_user))
        .route("/api/user/token/", post(create_token))
        .route("/api/user/token", post(create_token));

    // Protected routes. `route_layer` keeps authentication off the 405 fallback.
    let protected_routes = Router::new()
        .route("/api/user/me/", get(get_me).patch(update_me))
        .route("/api/user/me", get(get_me).patch(update_me))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    public_routes
        .merge(protected_routes)
        .with_state(state)
}
