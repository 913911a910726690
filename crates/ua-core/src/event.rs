//! Parsed event log lines.
//!
//! A log line reads `<timestamp> <objectId> <userId> <eventType>`. Lines whose
//! event type is outside the recognized vocabulary parse to `None`.

use chrono::{DateTime, NaiveDateTime, Timelike};

use crate::error::FormatIssue;
use crate::event_type::EventType;
use crate::query::SENTINEL_USER;

/// Number of buckets in an hourly distribution.
pub const HOURLY_BUCKETS: usize = 24;

/// One recognized action of a user on an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// The ISO 8601 timestamp as written in the log.
    pub timestamp: String,
    /// Hour of day derived from the timestamp, in `0..24`.
    pub hour: u8,
    pub object_id: String,
    pub user_id: String,
    pub event_type: EventType,
}

/// Returns the hour of day of an ISO 8601 timestamp.
///
/// Timestamps with an offset yield the hour in that offset; timestamps
/// without one are read as naive local time.
pub fn hour_from_timestamp(timestamp: &str) -> Result<u8, FormatIssue> {
    let hour = if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        dt.hour()
    } else {
        NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|_| FormatIssue::Timestamp(timestamp.to_string()))?
            .hour()
    };
    // chrono guarantees hour() < 24
    u8::try_from(hour).map_err(|_| FormatIssue::Timestamp(timestamp.to_string()))
}

/// Parses one log line.
///
/// Returns `Ok(None)` for a well-formed line with an unrecognized event type.
/// The field count is checked before the type so that a truncated line is
/// always reported, whatever its last field is. A recognized line logged by
/// [`SENTINEL_USER`] is rejected, so the sentinel never names a real user.
pub fn parse_line(line: &str) -> Result<Option<EventRecord>, FormatIssue> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [timestamp, object_id, user_id, event_type] = fields[..] else {
        return Err(FormatIssue::FieldCount(fields.len()));
    };

    let Ok(event_type) = event_type.parse::<EventType>() else {
        return Ok(None);
    };

    if user_id == SENTINEL_USER {
        return Err(FormatIssue::ReservedUserId);
    }

    let hour = hour_from_timestamp(timestamp)?;

    Ok(Some(EventRecord {
        timestamp: timestamp.to_string(),
        hour,
        object_id: object_id.to_string(),
        user_id: user_id.to_string(),
        event_type,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_uses_timestamp_offset() {
        assert_eq!(hour_from_timestamp("2015-01-01T15:00:01Z"), Ok(15));
        assert_eq!(hour_from_timestamp("2015-01-01T15:00:01-05:00"), Ok(15));
        assert_eq!(hour_from_timestamp("2015-01-01T00:59:59.250+09:00"), Ok(0));
    }

    #[test]
    fn hour_accepts_naive_timestamps() {
        assert_eq!(hour_from_timestamp("2015-01-01T23:10:00"), Ok(23));
        assert_eq!(hour_from_timestamp("2015-01-01T07:10:00.5"), Ok(7));
    }

    #[test]
    fn hour_rejects_garbage() {
        assert_eq!(
            hour_from_timestamp("yesterday"),
            Err(FormatIssue::Timestamp("yesterday".to_string()))
        );
        assert!(hour_from_timestamp("2015-01-01").is_err());
    }

    #[test]
    fn parses_recognized_line() {
        let event = parse_line("2015-01-01T10:00:00Z repo-1 alice PushEvent\n")
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            EventRecord {
                timestamp: "2015-01-01T10:00:00Z".to_string(),
                hour: 10,
                object_id: "repo-1".to_string(),
                user_id: "alice".to_string(),
                event_type: EventType::Push,
            }
        );
    }

    #[test]
    fn tolerates_repeated_whitespace() {
        let event = parse_line("2015-01-01T10:00:00Z\trepo-1   alice  WatchEvent")
            .unwrap()
            .unwrap();
        assert_eq!(event.user_id, "alice");
        assert_eq!(event.event_type, EventType::Watch);
    }

    #[test]
    fn drops_unrecognized_types() {
        assert_eq!(
            parse_line("2015-01-01T10:00:00Z repo-1 alice GollumEvent"),
            Ok(None)
        );
    }

    #[test]
    fn unrecognized_types_skip_timestamp_check() {
        assert_eq!(parse_line("not-a-time repo-1 alice MemberEvent"), Ok(None));
    }

    #[test]
    fn wrong_field_count_is_format_issue() {
        assert_eq!(
            parse_line("2015-01-01T10:00:00Z repo-1 alice"),
            Err(FormatIssue::FieldCount(3))
        );
        assert_eq!(
            parse_line("2015-01-01T10:00:00Z repo-1 alice PushEvent extra"),
            Err(FormatIssue::FieldCount(5))
        );
        assert_eq!(parse_line(""), Err(FormatIssue::FieldCount(0)));
    }

    #[test]
    fn sentinel_user_is_rejected() {
        assert_eq!(
            parse_line("2015-01-01T10:00:00Z repo-1 -1 PushEvent"),
            Err(FormatIssue::ReservedUserId)
        );
        assert_eq!(parse_line("2015-01-01T10:00:00Z repo-1 -1 GollumEvent"), Ok(None));
        assert!(parse_line("2015-01-01T10:00:00Z repo-1 -10 PushEvent").is_ok());
    }

    #[test]
    fn bad_timestamp_is_format_issue() {
        assert_eq!(
            parse_line("2015-13-01T10:00:00Z repo-1 alice PushEvent"),
            Err(FormatIssue::Timestamp("2015-13-01T10:00:00Z".to_string()))
        );
    }
}
