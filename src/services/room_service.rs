//! Room registry: creation with unique code allocation, membership, and host
//! reassignment.

use rand::seq::IndexedRandom;
use uuid::Uuid;

use crate::{
    dto::{
        room::{CreateRoomRequest, JoinRoomRequest, RoomSummary},
        validation::validate_room_code,
    },
    error::ServiceError,
    state::{
        SharedState,
        room::{Participant, ParticipantStatus, RoomSession, RoomStatus},
    },
};

/// Code alphabet with the ambiguous characters 0/O/1/I removed.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
/// Length of a generated join code.
const CODE_LENGTH: usize = 6;
/// Collision retry budget for code allocation.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Create a room in `waiting` status with its host membership in place.
///
/// The session is built fully before it becomes visible, so a room without its
/// host participant is never observable. Code uniqueness is enforced by the
/// atomic claim on the shared code map, retried up to [`MAX_CODE_ATTEMPTS`]
/// times.
pub async fn create_room(
    state: &SharedState,
    request: CreateRoomRequest,
) -> Result<RoomSummary, ServiceError> {
    create_room_with(state, request, generate_code).await
}

async fn create_room_with<F>(
    state: &SharedState,
    request: CreateRoomRequest,
    mut next_code: F,
) -> Result<RoomSummary, ServiceError>
where
    F: FnMut() -> String,
{
    ensure_user_reference(request.host_user_id)?;

    let mut session = RoomSession::new(
        next_code(),
        request.host_user_id,
        request.max_stages,
        state.config().starting_lives(),
    );

    let mut attempts = 1;
    while !state.claim_code(session.room.code.clone(), session.room.id) {
        if attempts >= MAX_CODE_ATTEMPTS {
            return Err(ServiceError::CodeExhausted);
        }
        session.room.code = next_code();
        attempts += 1;
    }

    let summary = RoomSummary::from(&session.room);
    state.insert_room(session);
    Ok(summary)
}

/// Join a waiting room by its code.
///
/// Joining twice with the same user is idempotent: the existing membership is
/// returned and no duplicate participant is created.
pub async fn join_room(
    state: &SharedState,
    request: JoinRoomRequest,
) -> Result<RoomSummary, ServiceError> {
    ensure_user_reference(request.user_id)?;

    let code = request.room_code.trim().to_uppercase();
    validate_room_code(&code)
        .map_err(|_| ServiceError::InvalidCodeFormat(request.room_code.clone()))?;

    let room_id = state
        .room_id_by_code(&code)
        .ok_or(ServiceError::RoomNotJoinable)?;
    // The room may be torn down between the code lookup and here; both gaps
    // surface as a plain not-joinable outcome.
    let session = state.room(&room_id).ok_or(ServiceError::RoomNotJoinable)?;
    let mut session = session.lock().await;

    if session.room.status != RoomStatus::Waiting {
        return Err(ServiceError::RoomNotJoinable);
    }

    if session.participants.contains_key(&request.user_id) {
        return Ok(RoomSummary::from(&session.room));
    }

    let lives = state.config().starting_lives();
    session
        .participants
        .insert(request.user_id, Participant::new(request.user_id, lives));
    session.touch();

    Ok(RoomSummary::from(&session.room))
}

/// Mark a membership as departed, reassigning the host or tearing the room
/// down when it empties out.
pub async fn leave_room(
    state: &SharedState,
    room_id: Uuid,
    user_id: Uuid,
) -> Result<(), ServiceError> {
    let session = state
        .room(&room_id)
        .ok_or(ServiceError::RoomNotFound(room_id))?;
    let mut session = session.lock().await;

    let participant = session
        .participants
        .get_mut(&user_id)
        .ok_or_else(|| ServiceError::Unauthorized("user is not a member of this room".into()))?;
    participant.status = ParticipantStatus::Left;
    session.touch();

    if !session.has_remaining_members() {
        // Close before removal so a racing join that already holds the
        // session handle observes a non-joinable room.
        session.room.status = RoomStatus::Finished;
        let code = session.room.code.clone();
        state.remove_room(&room_id, &code);
        return Ok(());
    }

    if session.room.host_id == user_id {
        if let Some(next_host) = session.first_active() {
            session.room.host_id = next_host;
        }
    }

    Ok(())
}

/// Reject the nil UUID as a user reference. Identity itself lives with the
/// external provider; this is the engine's malformed-reference guard.
fn ensure_user_reference(user_id: Uuid) -> Result<(), ServiceError> {
    if user_id.is_nil() {
        return Err(ServiceError::InvalidUser("nil user id".into()));
    }
    Ok(())
}

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let byte = CODE_ALPHABET
                .choose(&mut rng)
                .copied()
                .unwrap_or(b'A');
            byte as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, state::AppState};

    fn test_state() -> SharedState {
        AppState::new(AppConfig::default())
    }

    fn create_request() -> CreateRoomRequest {
        CreateRoomRequest {
            host_user_id: Uuid::new_v4(),
            max_stages: 3,
        }
    }

    #[test]
    fn generated_codes_use_the_restricted_alphabet() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
            assert!(!code.contains(['0', 'O', '1', 'I']));
        }
    }

    #[tokio::test]
    async fn create_room_starts_waiting_with_host_membership() {
        let state = test_state();
        let request = create_request();
        let host = request.host_user_id;

        let summary = create_room(&state, request).await.unwrap();
        assert_eq!(summary.status, RoomStatus::Waiting);
        assert_eq!(summary.current_stage, 0);
        assert_eq!(summary.host_id, host);
        assert!(validate_room_code(&summary.code).is_ok());

        let session = state.room(&summary.id).unwrap();
        let session = session.lock().await;
        assert_eq!(session.participants.len(), 1);
    }

    #[tokio::test]
    async fn create_room_rejects_the_nil_user() {
        let state = test_state();
        let err = create_room(
            &state,
            CreateRoomRequest {
                host_user_id: Uuid::nil(),
                max_stages: 3,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidUser(_)));
    }

    #[tokio::test]
    async fn code_allocation_fails_once_the_retry_budget_is_spent() {
        let state = test_state();
        state.claim_code("ABC234".into(), Uuid::new_v4());

        let err = create_room_with(&state, create_request(), || "ABC234".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::CodeExhausted));
        assert_eq!(state.room_count(), 0);
    }

    #[tokio::test]
    async fn code_allocation_retries_past_collisions() {
        let state = test_state();
        state.claim_code("ABC234".into(), Uuid::new_v4());

        let mut calls = 0;
        let summary = create_room_with(&state, create_request(), || {
            calls += 1;
            if calls < 3 { "ABC234".into() } else { "XYZ789".into() }
        })
        .await
        .unwrap();
        assert_eq!(summary.code, "XYZ789");
        assert_eq!(state.room_id_by_code("XYZ789"), Some(summary.id));
    }

    #[tokio::test]
    async fn join_room_is_idempotent_per_user() {
        let state = test_state();
        let room = create_room(&state, create_request()).await.unwrap();

        let user = Uuid::new_v4();
        let request = || JoinRoomRequest {
            room_code: room.code.clone(),
            user_id: user,
        };

        let first = join_room(&state, request()).await.unwrap();
        let second = join_room(&state, request()).await.unwrap();
        assert_eq!(first.id, second.id);

        let session = state.room(&room.id).unwrap();
        let session = session.lock().await;
        assert_eq!(session.participants.len(), 2);
    }

    #[tokio::test]
    async fn join_room_normalizes_code_case() {
        let state = test_state();
        let room = create_room(&state, create_request()).await.unwrap();

        let joined = join_room(
            &state,
            JoinRoomRequest {
                room_code: room.code.to_lowercase(),
                user_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap();
        assert_eq!(joined.id, room.id);
    }

    #[tokio::test]
    async fn join_room_rejects_malformed_codes() {
        let state = test_state();
        let err = join_room(
            &state,
            JoinRoomRequest {
                room_code: "AB#".into(),
                user_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCodeFormat(_)));
    }

    #[tokio::test]
    async fn join_room_rejects_unknown_codes() {
        let state = test_state();
        let err = join_room(
            &state,
            JoinRoomRequest {
                room_code: "ABC234".into(),
                user_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::RoomNotJoinable));
    }

    #[tokio::test]
    async fn leave_reassigns_host_to_next_active_in_join_order() {
        let state = test_state();
        let request = create_request();
        let host = request.host_user_id;
        let room = create_room(&state, request).await.unwrap();

        let second = Uuid::new_v4();
        join_room(
            &state,
            JoinRoomRequest {
                room_code: room.code.clone(),
                user_id: second,
            },
        )
        .await
        .unwrap();

        leave_room(&state, room.id, host).await.unwrap();

        let session = state.room(&room.id).unwrap();
        let session = session.lock().await;
        assert_eq!(session.room.host_id, second);
    }

    #[tokio::test]
    async fn last_departure_tears_the_room_down_and_frees_its_code() {
        let state = test_state();
        let request = create_request();
        let host = request.host_user_id;
        let room = create_room(&state, request).await.unwrap();

        leave_room(&state, room.id, host).await.unwrap();

        assert!(state.room(&room.id).is_none());
        assert!(state.room_id_by_code(&room.code).is_none());

        let err = leave_room(&state, room.id, host).await.unwrap_err();
        assert!(matches!(err, ServiceError::RoomNotFound(_)));
    }

    #[tokio::test]
    async fn leave_rejects_non_members() {
        let state = test_state();
        let room = create_room(&state, create_request()).await.unwrap();

        let err = leave_room(&state, room.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
