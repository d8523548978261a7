use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::game::{
        AdvanceStageResponse, ExpireTurnRequest, ExpireTurnResponse, GameStateResponse,
        StartGameResponse, SubmitAnswerRequest, SubmitAnswerResponse,
    },
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes handling the in-room game lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms/{id}/start", post(start_game))
        .route("/rooms/{id}/state", get(get_state))
        .route("/rooms/{id}/answers", post(submit_answer))
        .route("/rooms/{id}/turns/expire", post(expire_turn))
        .route("/rooms/{id}/advance", post(advance_stage))
}

/// Start the game: first stage, first turn, voice channel allocation.
#[utoipa::path(
    post,
    path = "/rooms/{id}/start",
    tag = "game",
    params(("id" = Uuid, Path, description = "Room to start")),
    responses(
        (status = 200, description = "Game started", body = StartGameResponse),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Game already started or finished")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StartGameResponse>, AppError> {
    let response = game_service::start_game(&state, id).await?;
    Ok(Json(response))
}

/// Fetch the room's full visible state.
#[utoipa::path(
    get,
    path = "/rooms/{id}/state",
    tag = "game",
    params(("id" = Uuid, Path, description = "Room to inspect")),
    responses(
        (status = 200, description = "Current room state", body = GameStateResponse),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_state(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameStateResponse>, AppError> {
    let response = game_service::get_state(&state, id).await?;
    Ok(Json(response))
}

/// Submit an answer for the current turn.
#[utoipa::path(
    post,
    path = "/rooms/{id}/answers",
    tag = "game",
    params(("id" = Uuid, Path, description = "Room the submission targets")),
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Submission adjudicated", body = SubmitAnswerResponse),
        (status = 400, description = "Out-of-turn, stale-stage, or malformed submission"),
        (status = 404, description = "Room or question not found"),
        (status = 409, description = "Turn already answered")
    )
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    let response = game_service::submit_answer(&state, id, payload).await?;
    Ok(Json(response))
}

/// Forfeit the current turn after its deadline expired.
#[utoipa::path(
    post,
    path = "/rooms/{id}/turns/expire",
    tag = "game",
    params(("id" = Uuid, Path, description = "Room whose current turn expired")),
    request_body = ExpireTurnRequest,
    responses(
        (status = 200, description = "Turn forfeited", body = ExpireTurnResponse),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Room is not playing or the stage is stale")
    )
)]
pub async fn expire_turn(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpireTurnRequest>,
) -> Result<Json<ExpireTurnResponse>, AppError> {
    let response = game_service::expire_turn(&state, id, payload).await?;
    Ok(Json(response))
}

/// Move the room to the next stage, or finish the game past the last one.
#[utoipa::path(
    post,
    path = "/rooms/{id}/advance",
    tag = "game",
    params(("id" = Uuid, Path, description = "Room to advance")),
    responses(
        (status = 200, description = "Stage advanced or game finished", body = AdvanceStageResponse),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Game has not started")
    )
)]
pub async fn advance_stage(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdvanceStageResponse>, AppError> {
    let response = game_service::advance_stage(&state, id).await?;
    Ok(Json(response))
}
