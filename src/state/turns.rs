use thiserror::Error;
use uuid::Uuid;

/// Lifecycle of the turn sequence for one (room, stage) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    /// No turn order has been built for the stage yet.
    Uninitialized,
    /// The stage has a turn order and a live cursor.
    Active,
    /// Every entrant has completed an attempt or dropped out.
    Complete,
}

/// Outcome recorded against an adjudicated turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The participant picked the correct option.
    Correct {
        /// Points awarded by the scoring policy.
        points: i32,
    },
    /// The participant picked a wrong option.
    Incorrect,
    /// The turn deadline expired without an accepted submission.
    Missed,
}

/// One participant's opportunity to answer within a stage.
#[derive(Debug, Clone)]
pub struct Turn {
    /// Participant who answers during this turn.
    pub participant: Uuid,
    /// Question assigned to the turn, set when the turn becomes current.
    pub question: Option<Uuid>,
    /// Whether the turn has been adjudicated.
    pub answered: bool,
    /// Adjudication outcome, present once `answered` is true.
    pub outcome: Option<TurnOutcome>,
}

impl Turn {
    fn new(participant: Uuid) -> Self {
        Self {
            participant,
            question: None,
            answered: false,
            outcome: None,
        }
    }
}

/// Error returned when a turn operation cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    /// A stage cannot be initialized without any active participant.
    #[error("cannot initialize a stage with no active participants")]
    NoActiveParticipants,
    /// The stage is not in the `Active` phase.
    #[error("stage turn sequence is not active")]
    NotActive,
    /// The caller is not the participant at the cursor.
    #[error("participant {got} attempted to act on {expected}'s turn")]
    OutOfTurn {
        /// Participant the cursor points at.
        expected: Uuid,
        /// Participant who attempted the action.
        got: Uuid,
    },
    /// The current turn has already been adjudicated.
    #[error("turn has already been answered")]
    AlreadyAnswered,
}

/// Turn scheduler for a room's current stage.
///
/// Owns the ordered turn sequence, the cursor, and per-turn question and
/// outcome records. Advancement skips participants that are no longer active
/// and flips the phase to [`StagePhase::Complete`] once no eligible turn
/// remains.
#[derive(Debug, Clone)]
pub struct StageTurns {
    stage: u32,
    phase: StagePhase,
    turns: Vec<Turn>,
    cursor: usize,
    used_questions: Vec<Uuid>,
}

impl Default for StageTurns {
    fn default() -> Self {
        Self {
            stage: 0,
            phase: StagePhase::Uninitialized,
            turns: Vec::new(),
            cursor: 0,
            used_questions: Vec::new(),
        }
    }
}

impl StageTurns {
    /// Create the scheduler in its pre-game state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage number the current sequence belongs to (0 before the game starts).
    pub fn stage(&self) -> u32 {
        self.stage
    }

    /// Current phase of the sequence.
    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    /// Whether every entrant has completed an attempt for the stage.
    pub fn is_complete(&self) -> bool {
        self.phase == StagePhase::Complete
    }

    /// Question ids already assigned within this stage, used as the pool
    /// exclusion set.
    pub fn used_questions(&self) -> &[Uuid] {
        &self.used_questions
    }

    /// Build the turn order for `stage` from `entrants` (join order expected).
    ///
    /// Re-invocation while the same stage is already active is a no-op so
    /// duplicate triggers from the transport layer are tolerated.
    pub fn initialize(&mut self, stage: u32, entrants: &[Uuid]) -> Result<(), TurnError> {
        if self.phase == StagePhase::Active && self.stage == stage {
            return Ok(());
        }
        if entrants.is_empty() {
            return Err(TurnError::NoActiveParticipants);
        }

        self.stage = stage;
        self.turns = entrants.iter().copied().map(Turn::new).collect();
        self.cursor = 0;
        self.used_questions.clear();
        self.phase = StagePhase::Active;
        Ok(())
    }

    /// Turn at the cursor, or `None` unless the stage is active.
    pub fn current_turn(&self) -> Option<&Turn> {
        match self.phase {
            StagePhase::Active => self.turns.get(self.cursor),
            _ => None,
        }
    }

    /// Position of the cursor and total entrant count, for view payloads.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.turns.len())
    }

    /// The turn belonging to `participant` in the current sequence, if any.
    ///
    /// Used to distinguish a duplicate submission for an already-adjudicated
    /// turn from an out-of-turn submission after the cursor has moved on.
    pub fn turn_for(&self, participant: &Uuid) -> Option<&Turn> {
        if self.phase == StagePhase::Uninitialized {
            return None;
        }
        self.turns
            .iter()
            .find(|turn| turn.participant == *participant)
    }

    /// Assign a question to the current turn and remember it in the stage
    /// exclusion set.
    pub fn assign_question(&mut self, question: Uuid) -> Result<(), TurnError> {
        let cursor = self.cursor;
        let turn = match self.phase {
            StagePhase::Active => self.turns.get_mut(cursor).ok_or(TurnError::NotActive)?,
            _ => return Err(TurnError::NotActive),
        };
        if turn.answered {
            return Err(TurnError::AlreadyAnswered);
        }

        turn.question = Some(question);
        self.used_questions.push(question);
        Ok(())
    }

    /// Adjudicate the current turn for `participant`.
    ///
    /// At most one outcome is ever recorded per turn; a concurrent late
    /// submission observes [`TurnError::AlreadyAnswered`] instead of
    /// double-applying consequences.
    pub fn record_outcome(
        &mut self,
        participant: Uuid,
        outcome: TurnOutcome,
    ) -> Result<(), TurnError> {
        let cursor = self.cursor;
        let turn = match self.phase {
            StagePhase::Active => self.turns.get_mut(cursor).ok_or(TurnError::NotActive)?,
            _ => return Err(TurnError::NotActive),
        };
        if turn.participant != participant {
            return Err(TurnError::OutOfTurn {
                expected: turn.participant,
                got: participant,
            });
        }
        if turn.answered {
            return Err(TurnError::AlreadyAnswered);
        }

        turn.answered = true;
        turn.outcome = Some(outcome);
        Ok(())
    }

    /// Move the cursor to the next unanswered turn whose participant is still
    /// active, or complete the stage when none remains.
    ///
    /// `still_active` reports whether a participant can still take a turn;
    /// turns of eliminated or departed participants are skipped.
    pub fn advance<F>(&mut self, still_active: F)
    where
        F: Fn(&Uuid) -> bool,
    {
        if self.phase != StagePhase::Active {
            return;
        }

        let next = self
            .turns
            .iter()
            .enumerate()
            .find(|(_, turn)| !turn.answered && still_active(&turn.participant))
            .map(|(index, _)| index);

        match next {
            Some(index) => self.cursor = index,
            None => self.phase = StagePhase::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrants(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn starts_uninitialized() {
        let turns = StageTurns::new();
        assert_eq!(turns.phase(), StagePhase::Uninitialized);
        assert!(turns.current_turn().is_none());
    }

    #[test]
    fn initialize_sets_cursor_to_first_entrant() {
        let players = entrants(3);
        let mut turns = StageTurns::new();
        turns.initialize(1, &players).unwrap();

        assert_eq!(turns.phase(), StagePhase::Active);
        assert_eq!(turns.current_turn().unwrap().participant, players[0]);
    }

    #[test]
    fn initialize_requires_entrants() {
        let mut turns = StageTurns::new();
        assert_eq!(
            turns.initialize(1, &[]),
            Err(TurnError::NoActiveParticipants)
        );
    }

    #[test]
    fn reinitializing_active_stage_is_a_noop() {
        let players = entrants(2);
        let mut turns = StageTurns::new();
        turns.initialize(1, &players).unwrap();
        turns.record_outcome(players[0], TurnOutcome::Incorrect).unwrap();
        turns.advance(|_| true);

        // A duplicate trigger must not reset the cursor or outcomes.
        turns.initialize(1, &players).unwrap();
        assert_eq!(turns.current_turn().unwrap().participant, players[1]);
    }

    #[test]
    fn initialize_next_stage_rebuilds_order() {
        let players = entrants(2);
        let mut turns = StageTurns::new();
        turns.initialize(1, &players).unwrap();
        turns.record_outcome(players[0], TurnOutcome::Incorrect).unwrap();
        turns.advance(|_| true);
        turns.record_outcome(players[1], TurnOutcome::Incorrect).unwrap();
        turns.advance(|_| true);
        assert!(turns.is_complete());

        turns.initialize(2, &players).unwrap();
        assert_eq!(turns.phase(), StagePhase::Active);
        assert_eq!(turns.current_turn().unwrap().participant, players[0]);
        assert!(turns.used_questions().is_empty());
    }

    #[test]
    fn record_outcome_rejects_out_of_turn() {
        let players = entrants(2);
        let mut turns = StageTurns::new();
        turns.initialize(1, &players).unwrap();

        let err = turns
            .record_outcome(players[1], TurnOutcome::Incorrect)
            .unwrap_err();
        assert_eq!(
            err,
            TurnError::OutOfTurn {
                expected: players[0],
                got: players[1],
            }
        );
    }

    #[test]
    fn second_adjudication_of_a_turn_is_rejected() {
        let players = entrants(2);
        let mut turns = StageTurns::new();
        turns.initialize(1, &players).unwrap();
        turns
            .record_outcome(players[0], TurnOutcome::Correct { points: 100 })
            .unwrap();

        let err = turns
            .record_outcome(players[0], TurnOutcome::Incorrect)
            .unwrap_err();
        assert_eq!(err, TurnError::AlreadyAnswered);
    }

    #[test]
    fn advance_skips_departed_participants() {
        let players = entrants(3);
        let mut turns = StageTurns::new();
        turns.initialize(1, &players).unwrap();
        turns.record_outcome(players[0], TurnOutcome::Incorrect).unwrap();

        let departed = players[1];
        turns.advance(|id| *id != departed);
        assert_eq!(turns.current_turn().unwrap().participant, players[2]);
    }

    #[test]
    fn stage_completes_when_every_entrant_has_answered() {
        let players = entrants(2);
        let mut turns = StageTurns::new();
        turns.initialize(1, &players).unwrap();

        turns
            .record_outcome(players[0], TurnOutcome::Correct { points: 100 })
            .unwrap();
        turns.advance(|_| true);
        assert!(!turns.is_complete());

        turns.record_outcome(players[1], TurnOutcome::Missed).unwrap();
        turns.advance(|_| true);
        assert!(turns.is_complete());
        assert!(turns.current_turn().is_none());
    }

    #[test]
    fn stage_completes_when_remaining_entrants_drop_out() {
        let players = entrants(2);
        let mut turns = StageTurns::new();
        turns.initialize(1, &players).unwrap();
        turns.record_outcome(players[0], TurnOutcome::Incorrect).unwrap();

        // The only remaining entrant left the room before their turn.
        let departed = players[1];
        turns.advance(|id| *id != departed);
        assert!(turns.is_complete());
    }

    #[test]
    fn assigned_questions_feed_the_exclusion_set() {
        let players = entrants(1);
        let mut turns = StageTurns::new();
        turns.initialize(1, &players).unwrap();

        let question = Uuid::new_v4();
        turns.assign_question(question).unwrap();
        assert_eq!(turns.used_questions(), &[question]);
        assert_eq!(turns.current_turn().unwrap().question, Some(question));
    }
}
