//! Request, response and event payload types exposed on the wire.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Live event envelope definitions.
pub mod events;
/// Field management payloads.
pub mod fields;
/// Health endpoint payloads.
pub mod health;
/// Match lifecycle payloads.
pub mod matches;
/// Region subscription payloads.
pub mod subscriptions;
/// User management payloads.
pub mod users;
/// Custom validators shared by request DTOs.
pub mod validation;

/// Render a [`SystemTime`] as an RFC 3339 / ISO-8601 string for the wire.
pub fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
