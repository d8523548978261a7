use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::format_system_time,
    state::room::{Participant, ParticipantStatus, Room, RoomStatus},
};

/// Payload used to create a brand-new room.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateRoomRequest {
    /// User who will host the room.
    pub host_user_id: Uuid,
    /// Number of stages the game runs for.
    #[validate(range(min = 1, max = 20, message = "max_stages must be between 1 and 20"))]
    pub max_stages: u32,
}

/// Payload used to join an existing room by its code.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinRoomRequest {
    /// Join code as entered by the player; normalized to uppercase server-side.
    pub room_code: String,
    /// Joining user.
    pub user_id: Uuid,
}

/// Payload used to leave a room.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveRoomRequest {
    /// Departing user.
    pub user_id: Uuid,
}

/// Public projection of a room exposed to REST/SSE clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomSummary {
    /// Opaque room identifier.
    pub id: Uuid,
    /// Join code for sharing.
    pub code: String,
    /// Current host.
    pub host_id: Uuid,
    /// Lifecycle status.
    pub status: RoomStatus,
    /// 0 while waiting, then the running stage number.
    pub current_stage: u32,
    /// Stage count the game runs for.
    pub max_stages: u32,
    /// Voice channel name, present once the game has started.
    pub voice_channel: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-update timestamp.
    pub updated_at: String,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            code: room.code.clone(),
            host_id: room.host_id,
            status: room.status,
            current_stage: room.current_stage,
            max_stages: room.max_stages,
            voice_channel: room.voice_channel.clone(),
            created_at: format_system_time(room.created_at),
            updated_at: format_system_time(room.updated_at),
        }
    }
}

/// Public projection of a participant exposed to REST/SSE clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantSummary {
    /// External user identity.
    pub user_id: Uuid,
    /// Remaining lives.
    pub lives: u8,
    /// Cumulative score.
    pub score: i32,
    /// Membership status.
    pub status: ParticipantStatus,
}

impl From<&Participant> for ParticipantSummary {
    fn from(participant: &Participant) -> Self {
        Self {
            user_id: participant.user_id,
            lives: participant.lives,
            score: participant.score,
            status: participant.status,
        }
    }
}
