//! Route definitions for the Warden HTTP API.
//!
//! Every route lives under `/api/v1`. Routes that need a caller identity are
//! wrapped in the authentication middleware; tiered routes dispatch through
//! a [`Cascade`].

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use warden_auth::rbac::catalog::{MANAGE_ROLES, MANAGE_USERS};

use crate::handlers;
use crate::middleware;
use crate::middleware::cascade::Cascade;
use crate::state::AppState;

/// Path prefix shared by every route.
pub const API_PREFIX: &str = "/api/v1";

/// Build the Axum router with every route, without outer layers.
pub fn build_router(state: AppState) -> Router {
    let protected = auth_routes()
        .merge(role_routes(&state))
        .merge(user_routes(&state))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public_routes())
        .merge(protected)
        .with_state(state)
}

/// Login and health: no token required.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route(&path("/auth/login"), post(handlers::auth::login))
        .route(&path("/health"), get(handlers::health::health))
}

/// Session management for the authenticated caller.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(&path("/auth/reset"), post(handlers::auth::reset))
        .route(&path("/auth/logout"), post(handlers::auth::logout))
        .route(&path("/auth/check"), get(handlers::auth::check))
        .route(&path("/auth/renew"), get(handlers::auth::renew))
        .route(&path("/auth/permissions"), get(handlers::auth::permissions))
}

fn role_routes(state: &AppState) -> Router<AppState> {
    let gate = &state.permission_gate;
    let catalog = Cascade::new().tier(
        gate.has_permission(MANAGE_ROLES),
        handlers::roles::permission_catalog,
    );

    Router::new().route(&path("/roles/permissions"), get(catalog.into_handler()))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    let gate = &state.permission_gate;
    let listing = Cascade::new()
        .tier(gate.has_permission(MANAGE_USERS), handlers::users::list_full)
        .any_user(handlers::users::list_summary);

    Router::new()
        .route(&path("/users"), get(listing.into_handler()))
        .route(&path("/users/me"), get(handlers::users::me))
}

fn path(route: &str) -> String {
    format!("{API_PREFIX}{route}")
}
