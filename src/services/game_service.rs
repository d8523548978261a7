//! Session controller and answer adjudicator.
//!
//! Orchestrates the room lifecycle (`waiting → playing → finished`), delegates
//! turn sequencing to the per-session scheduler, and applies score and life
//! consequences for submissions. Every operation locks the one session it
//! touches; that lock is the consistency boundary the turn-cursor and
//! host-reassignment rules rely on.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dto::{
        game::{
            AdvanceStageResponse, ExpireTurnRequest, ExpireTurnResponse, GameStateResponse,
            StartGameResponse, SubmitAnswerRequest, SubmitAnswerResponse, TurnSummary,
        },
        question::QuestionView,
        room::{ParticipantSummary, RoomSummary},
        sse::{
            AnswerSubmittedEvent, GameFinishedEvent, PlayerEliminatedEvent, QuestionLoadedEvent,
            StageCompleteEvent, TurnChangedEvent,
        },
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        room::{Participant, ParticipantStatus, RoomSession, RoomStatus},
        turns::TurnOutcome,
    },
};

/// Start the game: first stage, first turn, voice channel allocation.
pub async fn start_game(
    state: &SharedState,
    room_id: Uuid,
) -> Result<StartGameResponse, ServiceError> {
    let session = require_room(state, room_id)?;
    let mut session = session.lock().await;

    match session.room.status {
        RoomStatus::Waiting => {}
        RoomStatus::Playing => {
            return Err(ServiceError::InvalidState("game already started".into()));
        }
        RoomStatus::Finished => {
            return Err(ServiceError::InvalidState("game already finished".into()));
        }
    }

    let entrants = session.active_participants();
    session.turns.initialize(1, &entrants)?;
    session.room.status = RoomStatus::Playing;
    session.room.current_stage = 1;

    let voice_channel = session.voice_channel_name();
    session.room.voice_channel = Some(voice_channel.clone());

    let (question_event, turn_event) = load_question_for_turn(state, &mut session)?;
    session.touch();

    sse_events::broadcast_turn_changed(state, &turn_event);
    sse_events::broadcast_question_loaded(state, &question_event);

    info!(room = %room_id, %voice_channel, "game started");
    Ok(StartGameResponse {
        voice_channel,
        stage: 1,
    })
}

/// Move the room to the next stage, or finish the game past the last one.
///
/// Calling again on a finished room keeps returning `game_finished: true`
/// without mutating anything further.
pub async fn advance_stage(
    state: &SharedState,
    room_id: Uuid,
) -> Result<AdvanceStageResponse, ServiceError> {
    let session = require_room(state, room_id)?;
    let mut session = session.lock().await;

    match session.room.status {
        RoomStatus::Waiting => Err(ServiceError::InvalidState("game has not started".into())),
        RoomStatus::Finished => Ok(AdvanceStageResponse {
            game_finished: true,
            next_stage: None,
        }),
        RoomStatus::Playing => {
            let next_stage = session.room.current_stage + 1;
            if next_stage > session.room.max_stages {
                finish_game(state, &mut session);
                return Ok(AdvanceStageResponse {
                    game_finished: true,
                    next_stage: None,
                });
            }

            let entrants = session.active_participants();
            if entrants.is_empty() {
                // Everyone has been eliminated or left; there is nobody to
                // deal the next stage to.
                finish_game(state, &mut session);
                return Ok(AdvanceStageResponse {
                    game_finished: true,
                    next_stage: None,
                });
            }
            session.turns.initialize(next_stage, &entrants)?;
            session.room.current_stage = next_stage;

            let (question_event, turn_event) = load_question_for_turn(state, &mut session)?;
            session.touch();

            sse_events::broadcast_turn_changed(state, &turn_event);
            sse_events::broadcast_question_loaded(state, &question_event);

            Ok(AdvanceStageResponse {
                game_finished: false,
                next_stage: Some(next_stage),
            })
        }
    }
}

/// Adjudicate a submitted answer for the current turn.
pub async fn submit_answer(
    state: &SharedState,
    room_id: Uuid,
    request: SubmitAnswerRequest,
) -> Result<SubmitAnswerResponse, ServiceError> {
    let selected = parse_selected_option(&request.selected_option)?;

    let session = require_room(state, room_id)?;
    let mut session = session.lock().await;

    if session.room.status != RoomStatus::Playing {
        return Err(ServiceError::InvalidState("room is not playing".into()));
    }
    if request.stage != session.room.current_stage {
        return Err(ServiceError::InvalidSubmission(format!(
            "stage {} is not the current stage",
            request.stage
        )));
    }

    // A late duplicate lands after the cursor has moved on; reporting it as
    // already-answered (rather than out-of-turn) requires looking the
    // submitter's own turn up first.
    if session
        .turns
        .turn_for(&request.user_id)
        .is_some_and(|turn| turn.answered)
    {
        return Err(ServiceError::TurnAlreadyAnswered);
    }

    let current = session
        .turns
        .current_turn()
        .ok_or_else(|| ServiceError::InvalidState("stage has no active turn".into()))?;
    if current.participant != request.user_id {
        return Err(ServiceError::InvalidSubmission(
            "it is not this participant's turn".into(),
        ));
    }
    let assigned = current.question.ok_or_else(|| {
        ServiceError::InvalidState("no question assigned to the current turn".into())
    })?;
    if assigned != request.question_id {
        return Err(ServiceError::UnknownQuestion);
    }
    let question = state
        .questions()
        .get(&request.question_id)
        .ok_or(ServiceError::UnknownQuestion)?;

    if let Some(transcript) = &request.transcript {
        debug!(room = %room_id, user = %request.user_id, len = transcript.len(), "voice transcript attached");
    }

    let correct = selected == question.correct;
    let points_awarded = if correct {
        state.config().scoring().score(request.time_taken_ms)
    } else {
        0
    };

    let participant = session
        .participants
        .get_mut(&request.user_id)
        .ok_or_else(|| {
            ServiceError::InvalidSubmission("user is not a member of this room".into())
        })?;
    if participant.status != ParticipantStatus::Active {
        return Err(ServiceError::InvalidSubmission(
            "participant is no longer active in this room".into(),
        ));
    }
    let (outcome, eliminated) = if correct {
        participant.score += points_awarded;
        (TurnOutcome::Correct {
            points: points_awarded,
        }, false)
    } else {
        let eliminated = apply_life_loss(participant);
        (TurnOutcome::Incorrect, eliminated)
    };
    let lives_remaining = participant.lives;
    let score = participant.score;

    session.turns.record_outcome(request.user_id, outcome)?;
    advance_cursor(&mut session);
    let stage_complete = session.turns.is_complete();
    let stage = session.room.current_stage;
    session.touch();

    sse_events::broadcast_answer_submitted(
        state,
        &AnswerSubmittedEvent {
            room_id,
            stage,
            user_id: request.user_id,
            correct,
            points_awarded,
            score,
        },
    );
    if eliminated {
        sse_events::broadcast_player_eliminated(
            state,
            &PlayerEliminatedEvent {
                room_id,
                user_id: request.user_id,
            },
        );
    }
    announce_turn_progress(state, &mut session, room_id, stage, stage_complete)?;

    Ok(SubmitAnswerResponse {
        correct,
        points_awarded,
        lives_remaining,
        eliminated,
        stage_complete,
    })
}

/// Forfeit the current turn after its deadline expired.
///
/// A missed turn costs a life, same as a wrong answer, and moves the cursor
/// through the exact advancement path submissions use.
pub async fn expire_turn(
    state: &SharedState,
    room_id: Uuid,
    request: ExpireTurnRequest,
) -> Result<ExpireTurnResponse, ServiceError> {
    let session = require_room(state, room_id)?;
    let mut session = session.lock().await;

    if session.room.status != RoomStatus::Playing {
        return Err(ServiceError::InvalidState("room is not playing".into()));
    }
    if request.stage != session.room.current_stage {
        return Err(ServiceError::InvalidState(format!(
            "stage {} is not the current stage",
            request.stage
        )));
    }

    let current = session
        .turns
        .current_turn()
        .ok_or_else(|| ServiceError::InvalidState("stage has no active turn".into()))?;
    let participant_id = current.participant;

    let participant = session
        .participants
        .get_mut(&participant_id)
        .ok_or_else(|| ServiceError::InvalidState("unknown participant at the cursor".into()))?;
    // A member who left while holding the cursor forfeits the turn without
    // life or status consequences.
    let eliminated = if participant.status == ParticipantStatus::Active {
        apply_life_loss(participant)
    } else {
        false
    };
    let lives_remaining = participant.lives;

    session
        .turns
        .record_outcome(participant_id, TurnOutcome::Missed)?;
    advance_cursor(&mut session);
    let stage_complete = session.turns.is_complete();
    let stage = session.room.current_stage;
    session.touch();

    if eliminated {
        sse_events::broadcast_player_eliminated(
            state,
            &PlayerEliminatedEvent {
                room_id,
                user_id: participant_id,
            },
        );
    }
    announce_turn_progress(state, &mut session, room_id, stage, stage_complete)?;

    Ok(ExpireTurnResponse {
        participant: participant_id,
        lives_remaining,
        eliminated,
        stage_complete,
    })
}

/// Read-only composition of the room's full visible state.
pub async fn get_state(
    state: &SharedState,
    room_id: Uuid,
) -> Result<GameStateResponse, ServiceError> {
    let session = require_room(state, room_id)?;
    let session = session.lock().await;

    let room = RoomSummary::from(&session.room);
    let participants = scoreboard(&session);

    let current_turn = if session.room.status == RoomStatus::Playing {
        session.turns.current_turn().map(|turn| {
            let (position, of) = session.turns.progress();
            TurnSummary {
                participant: turn.participant,
                question: turn
                    .question
                    .and_then(|id| state.questions().get(&id))
                    .map(QuestionView::from),
                position,
                of,
            }
        })
    } else {
        None
    };

    Ok(GameStateResponse {
        room,
        participants,
        current_turn,
    })
}

fn require_room(
    state: &SharedState,
    room_id: Uuid,
) -> Result<Arc<Mutex<RoomSession>>, ServiceError> {
    state
        .room(&room_id)
        .ok_or(ServiceError::RoomNotFound(room_id))
}

/// Pick a question for the current turn, avoiding repeats within the stage,
/// and build the events that announce the new turn.
fn load_question_for_turn(
    state: &SharedState,
    session: &mut RoomSession,
) -> Result<(QuestionLoadedEvent, TurnChangedEvent), ServiceError> {
    let participant = session
        .turns
        .current_turn()
        .ok_or_else(|| ServiceError::InvalidState("stage has no active turn".into()))?
        .participant;

    let question = state
        .questions()
        .pick(None, None, session.turns.used_questions())
        .ok_or(ServiceError::NoQuestionsAvailable)?;
    let view = QuestionView::from(question);
    session.turns.assign_question(question.id)?;

    let room_id = session.room.id;
    let stage = session.room.current_stage;
    Ok((
        QuestionLoadedEvent {
            room_id,
            stage,
            participant,
            question: view,
        },
        TurnChangedEvent {
            room_id,
            stage,
            participant,
        },
    ))
}

/// Move the cursor past participants that can no longer take turns.
fn advance_cursor(session: &mut RoomSession) {
    let RoomSession {
        participants,
        turns,
        ..
    } = session;
    turns.advance(|id| {
        participants
            .get(id)
            .is_some_and(|p| p.status == ParticipantStatus::Active)
    });
}

/// After an adjudicated or missed turn: either announce stage completion or
/// hand the next participant their question.
fn announce_turn_progress(
    state: &SharedState,
    session: &mut RoomSession,
    room_id: Uuid,
    stage: u32,
    stage_complete: bool,
) -> Result<(), ServiceError> {
    if stage_complete {
        sse_events::broadcast_stage_complete(state, &StageCompleteEvent { room_id, stage });
        return Ok(());
    }

    let (question_event, turn_event) = load_question_for_turn(state, session)?;
    sse_events::broadcast_turn_changed(state, &turn_event);
    sse_events::broadcast_question_loaded(state, &question_event);
    Ok(())
}

fn finish_game(state: &SharedState, session: &mut RoomSession) {
    session.room.status = RoomStatus::Finished;
    session.touch();

    sse_events::broadcast_game_finished(
        state,
        &GameFinishedEvent {
            room_id: session.room.id,
            scoreboard: scoreboard(session),
        },
    );
    info!(room = %session.room.id, "game finished");
}

fn scoreboard(session: &RoomSession) -> Vec<ParticipantSummary> {
    let mut rows: Vec<ParticipantSummary> = session
        .participants
        .values()
        .map(ParticipantSummary::from)
        .collect();
    rows.sort_by(|a, b| b.score.cmp(&a.score));
    rows
}

/// Decrement a life, eliminating the participant at zero.
///
/// Only an `active` membership can transition to `eliminated`; a member who
/// already left keeps their status.
fn apply_life_loss(participant: &mut Participant) -> bool {
    participant.lives = participant.lives.saturating_sub(1);
    if participant.lives == 0 && participant.status == ParticipantStatus::Active {
        participant.status = ParticipantStatus::Eliminated;
        return true;
    }
    false
}

fn parse_selected_option(raw: &str) -> Result<char, ServiceError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase()),
        _ => Err(ServiceError::InvalidSubmission(
            "selected option must be a single letter".into(),
        )),
    }
}
