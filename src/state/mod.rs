//! Shared application state: room sessions, the question bank, and the event hub.

pub mod questions;
pub mod room;
mod sse;
pub mod turns;

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{config::AppConfig, state::questions::QuestionBank, state::room::RoomSession};

pub use self::sse::SseHub;

/// Cheaply clonable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Capacity of the domain-event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Central application state holding every live room session.
///
/// Each session sits behind its own mutex; locking the session is the
/// consistency boundary for all of that room's mutations. The code map doubles
/// as the uniqueness authority for join codes: claiming an entry is an atomic
/// insert-if-unused.
pub struct AppState {
    config: AppConfig,
    questions: QuestionBank,
    rooms: DashMap<Uuid, Arc<Mutex<RoomSession>>>,
    codes: DashMap<String, Uuid>,
    events: SseHub,
}

impl AppState {
    /// Construct the shared state from the loaded configuration.
    pub fn new(config: AppConfig) -> SharedState {
        let questions = QuestionBank::new(config.questions().to_vec());
        Arc::new(Self {
            config,
            questions,
            rooms: DashMap::new(),
            codes: DashMap::new(),
            events: SseHub::new(EVENT_CHANNEL_CAPACITY),
        })
    }

    /// Runtime configuration (scoring policy, lives, alphabet).
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The question pool.
    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    /// Hub carrying domain events to the external fan-out stream.
    pub fn events(&self) -> &SseHub {
        &self.events
    }

    /// Handle to a room session, if the room exists.
    pub fn room(&self, id: &Uuid) -> Option<Arc<Mutex<RoomSession>>> {
        self.rooms.get(id).map(|entry| entry.value().clone())
    }

    /// Resolve a normalized join code to a room id.
    pub fn room_id_by_code(&self, code: &str) -> Option<Uuid> {
        self.codes.get(code).map(|entry| *entry.value())
    }

    /// Atomically claim `code` for `room_id`; `false` when already taken.
    pub fn claim_code(&self, code: String, room_id: Uuid) -> bool {
        match self.codes.entry(code) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(room_id);
                true
            }
        }
    }

    /// Register a freshly created session under its id.
    pub fn insert_room(&self, session: RoomSession) -> Arc<Mutex<RoomSession>> {
        let id = session.room.id;
        let handle = Arc::new(Mutex::new(session));
        self.rooms.insert(id, handle.clone());
        handle
    }

    /// Drop a room and free its join code.
    pub fn remove_room(&self, id: &Uuid, code: &str) {
        self.rooms.remove(id);
        self.codes.remove(code);
    }

    /// Number of live rooms, exposed for the health payload.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
