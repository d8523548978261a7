use std::time::SystemTime;

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::turns::StageTurns;

/// Number of characters of the room id used for the voice channel name.
const VOICE_CHANNEL_PREFIX_LEN: usize = 12;

/// Lifecycle status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// The room accepts joins; the game has not started.
    Waiting,
    /// Stages are in progress.
    Playing,
    /// The game is over (or the room was torn down).
    Finished,
}

/// Membership status of a participant within a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    /// Still in the game.
    Active,
    /// Ran out of lives.
    Eliminated,
    /// Left the room voluntarily.
    Left,
}

/// A user's membership and per-session state within a room.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Reference to the external user identity.
    pub user_id: Uuid,
    /// Remaining lives; reaching 0 forces [`ParticipantStatus::Eliminated`].
    pub lives: u8,
    /// Cumulative score across stages.
    pub score: i32,
    /// Current membership status.
    pub status: ParticipantStatus,
}

impl Participant {
    /// Fresh membership with the configured number of lives and no score.
    pub fn new(user_id: Uuid, lives: u8) -> Self {
        Self {
            user_id,
            lives,
            score: 0,
            status: ParticipantStatus::Active,
        }
    }
}

/// Core room record: identity, join code, host, and stage progress.
#[derive(Debug, Clone)]
pub struct Room {
    /// Opaque room identifier.
    pub id: Uuid,
    /// Human-entered join code (6 characters, ambiguity-free alphabet).
    pub code: String,
    /// Participant currently holding the host role.
    pub host_id: Uuid,
    /// Lifecycle status.
    pub status: RoomStatus,
    /// 0 while waiting, then 1..=max_stages while playing.
    pub current_stage: u32,
    /// Number of stages the game runs for.
    pub max_stages: u32,
    /// Channel name handed to the external voice SDK, set on game start.
    pub voice_channel: Option<String>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the room was mutated.
    pub updated_at: SystemTime,
}

/// Aggregated mutable state for one room, guarded by a single lock.
///
/// Holding all of a room's records behind one mutex gives every lifecycle
/// command the consistency boundary the adjudication and host-reassignment
/// rules require.
#[derive(Debug)]
pub struct RoomSession {
    /// The room record itself.
    pub room: Room,
    /// Memberships keyed by user id, preserving join order.
    pub participants: IndexMap<Uuid, Participant>,
    /// Turn scheduler for the current stage.
    pub turns: StageTurns,
}

impl RoomSession {
    /// Build a new waiting room with its host membership in place.
    pub fn new(code: String, host_user_id: Uuid, max_stages: u32, starting_lives: u8) -> Self {
        let timestamp = SystemTime::now();
        let id = Uuid::new_v4();

        let mut participants = IndexMap::new();
        participants.insert(host_user_id, Participant::new(host_user_id, starting_lives));

        Self {
            room: Room {
                id,
                code,
                host_id: host_user_id,
                status: RoomStatus::Waiting,
                current_stage: 0,
                max_stages,
                voice_channel: None,
                created_at: timestamp,
                updated_at: timestamp,
            },
            participants,
            turns: StageTurns::new(),
        }
    }

    /// User ids of all `active` participants, in join order.
    pub fn active_participants(&self) -> Vec<Uuid> {
        self.participants
            .iter()
            .filter(|(_, p)| p.status == ParticipantStatus::Active)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether a participant may still take turns.
    pub fn is_participant_active(&self, user_id: &Uuid) -> bool {
        self.participants
            .get(user_id)
            .is_some_and(|p| p.status == ParticipantStatus::Active)
    }

    /// Whether anyone other than departed members remains in the room.
    pub fn has_remaining_members(&self) -> bool {
        self.participants
            .values()
            .any(|p| p.status != ParticipantStatus::Left)
    }

    /// First `active` participant in join order, used for host reassignment.
    pub fn first_active(&self) -> Option<Uuid> {
        self.active_participants().first().copied()
    }

    /// Deterministic voice channel name derived from the room id.
    pub fn voice_channel_name(&self) -> String {
        let simple = self.room.id.simple().to_string();
        format!("voice-{}", &simple[..VOICE_CHANNEL_PREFIX_LEN])
    }

    /// Refresh the updated-at timestamp after a mutation.
    pub fn touch(&mut self) {
        self.room.updated_at = SystemTime::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_waiting_with_host_membership() {
        let host = Uuid::new_v4();
        let session = RoomSession::new("ABC234".into(), host, 3, 3);

        assert_eq!(session.room.status, RoomStatus::Waiting);
        assert_eq!(session.room.current_stage, 0);
        assert_eq!(session.room.host_id, host);

        let member = session.participants.get(&host).unwrap();
        assert_eq!(member.lives, 3);
        assert_eq!(member.score, 0);
        assert_eq!(member.status, ParticipantStatus::Active);
    }

    #[test]
    fn voice_channel_name_is_deterministic() {
        let session = RoomSession::new("ABC234".into(), Uuid::new_v4(), 3, 3);
        let name = session.voice_channel_name();
        assert_eq!(name, session.voice_channel_name());
        assert_eq!(name.len(), "voice-".len() + 12);
    }

    #[test]
    fn first_active_follows_join_order() {
        let host = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();
        let mut session = RoomSession::new("ABC234".into(), host, 3, 3);
        session.participants.insert(second, Participant::new(second, 3));
        session.participants.insert(third, Participant::new(third, 3));

        session.participants.get_mut(&host).unwrap().status = ParticipantStatus::Left;
        assert_eq!(session.first_active(), Some(second));
    }
}
