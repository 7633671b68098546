//! # Timestamps, Ids and ISO-8601 Encoding
//!
//! Every date in the snapshot is written as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
//! Timestamps are truncated to whole milliseconds when they are created so
//! that a value read back from the snapshot compares equal to the value that
//! was written.
//!
//! Use the serde helpers on date fields:
//! ```rust
//! use chrono::{DateTime, Utc};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Stamped {
//!     #[serde(with = "stockbook_core::timestamp::iso")]
//!     at: DateTime<Utc>,
//! }
//! ```

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

/// Current time, truncated to millisecond precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generates a new entity id (UUID v4).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Formats a timestamp the way the snapshot stores it.
pub fn format_iso(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an ISO-8601 / RFC 3339 timestamp into UTC.
///
/// Accepts both `2024-05-01T10:00:00Z` and `2024-05-01T10:00:00.250Z`, and
/// explicit offsets such as `+05:00`.
pub fn parse_iso(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s.trim()).map(|dt| dt.with_timezone(&Utc))
}

/// Serde adapter for `DateTime<Utc>` fields.
pub mod iso {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso(&raw).map_err(|e| de::Error::custom(format!("invalid date '{raw}': {e}")))
    }
}

/// Serde adapter for `Option<DateTime<Utc>>` fields.
pub mod iso_option {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        at: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match at {
            Some(at) => serializer.serialize_some(&super::format_iso(at)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse_iso(&raw)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid date '{raw}': {e}"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "iso")]
        at: DateTime<Utc>,
        #[serde(with = "iso_option", default)]
        maybe: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_now_is_millisecond_precision() {
        let at = now();
        assert_eq!(at.nanosecond() % 1_000_000, 0);
    }

    #[test]
    fn test_format_iso() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
        assert_eq!(format_iso(&at), "2024-05-01T10:30:00.000Z");
    }

    #[test]
    fn test_parse_iso_variants() {
        let plain = parse_iso("2024-05-01T10:30:00Z").unwrap();
        let millis = parse_iso("2024-05-01T10:30:00.000Z").unwrap();
        let offset = parse_iso("2024-05-01T15:30:00+05:00").unwrap();
        assert_eq!(plain, millis);
        assert_eq!(plain, offset);
        assert!(parse_iso("01/05/2024").is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let value = Stamped {
            at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            maybe: None,
        };
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"at":"2024-01-02T03:04:05.000Z","maybe":null}"#);

        let back: Stamped = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_missing_optional_defaults_to_none() {
        let back: Stamped = serde_json::from_str(r#"{"at":"2024-01-02T03:04:05Z"}"#).unwrap();
        assert!(back.maybe.is_none());
    }

    #[test]
    fn test_rejects_garbage_date() {
        let result: Result<Stamped, _> = serde_json::from_str(r#"{"at":"yesterday"}"#);
        assert!(result.is_err());
    }
}
