use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{
    question::QuestionView,
    room::{ParticipantSummary, RoomSummary},
};

/// Response returned once a game has been started.
#[derive(Debug, Serialize, ToSchema)]
pub struct StartGameResponse {
    /// Channel name the external voice SDK should use for this room.
    pub voice_channel: String,
    /// The stage the game opened with (always 1).
    pub stage: u32,
}

/// Response returned by the stage-advancement operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdvanceStageResponse {
    /// Whether the game is over.
    pub game_finished: bool,
    /// The stage now running, absent when the game finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_stage: Option<u32>,
}

/// Payload submitted when a participant answers their turn's question.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitAnswerRequest {
    /// Answering user.
    pub user_id: Uuid,
    /// Stage the submission targets; must match the room's current stage.
    pub stage: u32,
    /// Question the submission answers; must match the turn assignment.
    pub question_id: Uuid,
    /// Selected option label (single letter, case-insensitive).
    pub selected_option: String,
    /// Time the participant took, in milliseconds.
    pub time_taken_ms: u64,
    /// Optional voice transcript captured during the turn.
    #[serde(default)]
    pub transcript: Option<String>,
}

/// Adjudication result returned for an accepted submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitAnswerResponse {
    /// Whether the selected option was correct.
    pub correct: bool,
    /// Points added to the participant's score (0 for wrong answers).
    pub points_awarded: i32,
    /// Lives the participant has left after adjudication.
    pub lives_remaining: u8,
    /// Whether the participant was eliminated by this submission.
    pub eliminated: bool,
    /// Whether the stage completed with this turn.
    pub stage_complete: bool,
}

/// Payload sent by the external deadline timer when a turn expires.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExpireTurnRequest {
    /// Stage the expiry targets; must match the room's current stage.
    pub stage: u32,
}

/// Result of treating the current turn as missed.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpireTurnResponse {
    /// Participant whose turn was forfeited.
    pub participant: Uuid,
    /// Lives that participant has left.
    pub lives_remaining: u8,
    /// Whether the miss eliminated the participant.
    pub eliminated: bool,
    /// Whether the stage completed with this turn.
    pub stage_complete: bool,
}

/// The turn currently awaiting an answer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TurnSummary {
    /// Participant expected to answer.
    pub participant: Uuid,
    /// Question assigned to the turn, if one has been loaded.
    pub question: Option<QuestionView>,
    /// Zero-based position of the turn within the stage order.
    pub position: usize,
    /// Number of entrants in the stage order.
    pub of: usize,
}

/// Read-only composition of a room's full visible state.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameStateResponse {
    /// The room record.
    pub room: RoomSummary,
    /// Participants sorted by score, highest first.
    pub participants: Vec<ParticipantSummary>,
    /// Current turn, populated only while the room is playing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_turn: Option<TurnSummary>,
}
