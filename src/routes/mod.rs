//! REST route composition.

use axum::Router;

use crate::state::SharedState;

/// Account administration, event administration, and maintenance endpoints.
pub mod admin;
/// Registration, login, and profile endpoints.
pub mod auth;
/// Swagger UI and OpenAPI document.
pub mod docs;
/// Public event listing and detail endpoints.
pub mod events;
/// Health check endpoint.
pub mod health;
/// Leaderboard and statistics endpoints.
pub mod leaderboard;
/// Pick submission and retrieval endpoints.
pub mod picks;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(auth::router())
        .merge(events::router())
        .merge(picks::router())
        .merge(leaderboard::router())
        .merge(admin::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
