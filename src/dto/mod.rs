use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// `/healthcheck` payload.
pub mod health;
/// Score submission, queries and leaderboard payloads.
pub mod score;
/// Play session payloads.
pub mod session;
/// Custom validators used by request DTOs.
pub mod validation;

/// Render a timestamp as an RFC 3339 (ISO-8601) string in UTC.
pub(crate) fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn formats_as_utc_rfc3339() {
        let at = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(format_system_time(at), "2023-11-14T22:13:20Z");
    }
}
