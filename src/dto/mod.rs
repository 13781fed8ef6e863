//! Request/response types exchanged with REST clients.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod admin;
pub mod auth;
pub mod common;
pub mod event;
pub mod health;
pub mod leaderboard;
pub mod pick;
pub mod validation;

/// Render a timestamp as RFC 3339 for JSON payloads.
pub fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Parse an RFC 3339 timestamp supplied by a client.
pub fn parse_rfc3339(value: &str) -> Result<SystemTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339).map(SystemTime::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_roundtrip() {
        let stamp = parse_rfc3339("2026-11-14T22:00:00Z").unwrap();
        assert_eq!(format_system_time(stamp), "2026-11-14T22:00:00Z");
    }

    #[test]
    fn garbage_timestamps_are_rejected() {
        assert!(parse_rfc3339("next saturday").is_err());
        assert!(parse_rfc3339("").is_err());
    }
}
