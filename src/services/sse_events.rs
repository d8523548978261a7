//! Domain-event emission onto the fan-out stream.
//!
//! Every broadcast happens after the corresponding session mutation, with the
//! payload snapshotted while the session lock is still held.

use serde::Serialize;
use tracing::warn;

use crate::{
    dto::sse::{
        AnswerSubmittedEvent, GameFinishedEvent, PlayerEliminatedEvent, QuestionLoadedEvent,
        ServerEvent, StageCompleteEvent, TurnChangedEvent,
    },
    state::SharedState,
};

const EVENT_QUESTION_LOADED: &str = "question.loaded";
const EVENT_TURN_CHANGED: &str = "turn.changed";
const EVENT_ANSWER_SUBMITTED: &str = "answer.submitted";
const EVENT_PLAYER_ELIMINATED: &str = "player.eliminated";
const EVENT_STAGE_COMPLETE: &str = "stage.complete";
const EVENT_GAME_FINISHED: &str = "game.finished";

/// Broadcast that a question was assigned to the current turn.
pub fn broadcast_question_loaded(state: &SharedState, payload: &QuestionLoadedEvent) {
    send_event(state, EVENT_QUESTION_LOADED, payload);
}

/// Broadcast that the turn cursor moved to a new participant.
pub fn broadcast_turn_changed(state: &SharedState, payload: &TurnChangedEvent) {
    send_event(state, EVENT_TURN_CHANGED, payload);
}

/// Broadcast an adjudicated submission.
pub fn broadcast_answer_submitted(state: &SharedState, payload: &AnswerSubmittedEvent) {
    send_event(state, EVENT_ANSWER_SUBMITTED, payload);
}

/// Broadcast that a participant ran out of lives.
pub fn broadcast_player_eliminated(state: &SharedState, payload: &PlayerEliminatedEvent) {
    send_event(state, EVENT_PLAYER_ELIMINATED, payload);
}

/// Broadcast that a stage finished its turn sequence.
pub fn broadcast_stage_complete(state: &SharedState, payload: &StageCompleteEvent) {
    send_event(state, EVENT_STAGE_COMPLETE, payload);
}

/// Broadcast the final scoreboard.
pub fn broadcast_game_finished(state: &SharedState, payload: &GameFinishedEvent) {
    send_event(state, EVENT_GAME_FINISHED, payload);
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.events().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
