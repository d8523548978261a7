use axum::Router;

use crate::state::SharedState;

/// Swagger UI routes.
pub mod docs;
/// Game lifecycle routes.
pub mod game;
/// Health check routes.
pub mod health;
/// Question pool routes.
pub mod question;
/// Room membership routes.
pub mod room;
/// Server-sent events routes.
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(room::router())
        .merge(game::router())
        .merge(question::router())
        .merge(sse::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
