use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{question::QuestionView, room::ParticipantSummary};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// SSE event name.
    pub event: Option<String>,
    /// Serialized JSON payload.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }

    /// Build an event from an already-rendered data string.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a question has been assigned to the current turn.
pub struct QuestionLoadedEvent {
    /// Room the event belongs to.
    pub room_id: Uuid,
    /// Stage the turn belongs to.
    pub stage: u32,
    /// Participant whose turn it is.
    pub participant: Uuid,
    /// The question, without its correct label.
    pub question: QuestionView,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the turn cursor moves to a new participant.
pub struct TurnChangedEvent {
    /// Room the event belongs to.
    pub room_id: Uuid,
    /// Stage the turn belongs to.
    pub stage: u32,
    /// Participant now expected to answer.
    pub participant: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after a submission has been adjudicated.
pub struct AnswerSubmittedEvent {
    /// Room the event belongs to.
    pub room_id: Uuid,
    /// Stage the submission targeted.
    pub stage: u32,
    /// Answering user.
    pub user_id: Uuid,
    /// Whether the answer was correct.
    pub correct: bool,
    /// Points awarded by the scoring policy.
    pub points_awarded: i32,
    /// The participant's score after adjudication.
    pub score: i32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a participant runs out of lives.
pub struct PlayerEliminatedEvent {
    /// Room the event belongs to.
    pub room_id: Uuid,
    /// Eliminated user.
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when every entrant of a stage has completed an attempt.
pub struct StageCompleteEvent {
    /// Room the event belongs to.
    pub room_id: Uuid,
    /// The completed stage.
    pub stage: u32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the game is over, carrying the final scoreboard.
pub struct GameFinishedEvent {
    /// Room the event belongs to.
    pub room_id: Uuid,
    /// Final standings, highest score first.
    pub scoreboard: Vec<ParticipantSummary>,
}
