/// OpenAPI documentation generation.
pub mod documentation;
/// Game lifecycle, turn sequencing and answer adjudication.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Question pool sampling outside any room.
pub mod question_service;
/// Room registry and membership management.
pub mod room_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
