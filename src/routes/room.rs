use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::room::{CreateRoomRequest, JoinRoomRequest, LeaveRoomRequest, RoomSummary},
    error::AppError,
    services::room_service,
    state::SharedState,
};

/// Routes handling room creation and membership.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/join", post(join_room))
        .route("/rooms/{id}/leave", post(leave_room))
}

/// Create a fresh room in `waiting` status and return its join code.
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "room",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = RoomSummary),
        (status = 400, description = "Invalid host reference or stage count"),
        (status = 409, description = "No unique join code could be allocated")
    )
)]
pub async fn create_room(
    State(state): State<SharedState>,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<Json<RoomSummary>, AppError> {
    payload.validate()?;
    let summary = room_service::create_room(&state, payload).await?;
    Ok(Json(summary))
}

/// Join a waiting room by its code.
#[utoipa::path(
    post,
    path = "/rooms/join",
    tag = "room",
    request_body = JoinRoomRequest,
    responses(
        (status = 200, description = "Room joined", body = RoomSummary),
        (status = 400, description = "Malformed join code or user reference"),
        (status = 409, description = "Room is not joinable")
    )
)]
pub async fn join_room(
    State(state): State<SharedState>,
    Json(payload): Json<JoinRoomRequest>,
) -> Result<Json<RoomSummary>, AppError> {
    let summary = room_service::join_room(&state, payload).await?;
    Ok(Json(summary))
}

/// Leave a room, reassigning the host or tearing the room down when empty.
#[utoipa::path(
    post,
    path = "/rooms/{id}/leave",
    tag = "room",
    params(("id" = Uuid, Path, description = "Identifier of the room to leave")),
    request_body = LeaveRoomRequest,
    responses(
        (status = 204, description = "Membership marked as departed"),
        (status = 401, description = "User is not a member of this room"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn leave_room(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeaveRoomRequest>,
) -> Result<axum::http::StatusCode, AppError> {
    room_service::leave_room(&state, id, payload.user_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
