use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the static health payload and the live room count.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.room_count())
}
