//! Request, response, and event payload types exposed by the HTTP surface.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Game lifecycle and adjudication payloads.
pub mod game;
/// Health check payloads.
pub mod health;
/// Question pool payloads.
pub mod question;
/// Room and participant payloads.
pub mod room;
/// Server-sent event payloads.
pub mod sse;
/// Shared field validators.
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
