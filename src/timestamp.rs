use crate::error::{ReleaseIndexError, Result};
use chrono::{DateTime, Utc};

/// Parse an ISO-8601 timestamp from the release feed.
///
/// The feed is expected to publish UTC instants only, so anything carrying
/// a non-zero offset is rejected rather than converted.
pub fn parse_utc(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value).map_err(|e| {
        ReleaseIndexError::InvalidTimestamp {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }
    })?;

    if parsed.offset().local_minus_utc() != 0 {
        return Err(ReleaseIndexError::InvalidTimestamp {
            field,
            value: value.to_string(),
            reason: format!("expected UTC, found offset {}", parsed.offset()),
        });
    }

    Ok(parsed.with_timezone(&Utc))
}
