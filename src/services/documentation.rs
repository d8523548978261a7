use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Echo Arena Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::room::create_room,
        crate::routes::room::join_room,
        crate::routes::room::leave_room,
        crate::routes::game::start_game,
        crate::routes::game::get_state,
        crate::routes::game::submit_answer,
        crate::routes::game::expire_turn,
        crate::routes::game::advance_stage,
        crate::routes::question::random_question,
        crate::routes::sse::room_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::room::CreateRoomRequest,
            crate::dto::room::JoinRoomRequest,
            crate::dto::room::LeaveRoomRequest,
            crate::dto::room::RoomSummary,
            crate::dto::room::ParticipantSummary,
            crate::dto::question::QuestionView,
            crate::dto::question::AnswerOptionView,
            crate::dto::game::StartGameResponse,
            crate::dto::game::AdvanceStageResponse,
            crate::dto::game::SubmitAnswerRequest,
            crate::dto::game::SubmitAnswerResponse,
            crate::dto::game::ExpireTurnRequest,
            crate::dto::game::ExpireTurnResponse,
            crate::dto::game::TurnSummary,
            crate::dto::game::GameStateResponse,
            crate::dto::sse::QuestionLoadedEvent,
            crate::dto::sse::TurnChangedEvent,
            crate::dto::sse::AnswerSubmittedEvent,
            crate::dto::sse::PlayerEliminatedEvent,
            crate::dto::sse::StageCompleteEvent,
            crate::dto::sse::GameFinishedEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "room", description = "Room creation and membership"),
        (name = "game", description = "Game lifecycle, turns and adjudication"),
        (name = "question", description = "Question pool sampling"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
