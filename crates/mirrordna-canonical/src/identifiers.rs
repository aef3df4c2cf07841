use crate::validation::ValidationError;
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// UTC ISO-8601 timestamp with a trailing `Z` (e.g. `2025-11-14T10:30:00.123456Z`).
///
/// Deserialization is transparent and does not validate: persisted records are
/// hashed over the exact string they carry, so rewriting it on load would break
/// their checksum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

const TIMESTAMP_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?Z$";

impl Timestamp {
    /// Creates a new instance without validation; callers are responsible for conformity.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Parses a validated timestamp from a string.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !Regex::new(TIMESTAMP_PATTERN)
            .expect("invalid regex")
            .is_match(&s)
        {
            return Err(ValidationError::InvalidTimestamp(s));
        }
        Ok(Self(s))
    }

    /// Current UTC time with microsecond precision.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Formats a UTC datetime with microsecond precision and a `Z` suffix.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    /// Interprets the timestamp as a UTC datetime, if it is valid RFC 3339.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.0)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Borrows the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Timestamp {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Timestamp {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_is_utc_with_z_suffix() {
        let ts = Timestamp::now();
        assert!(ts.as_str().ends_with('Z'));
        assert!(ts.as_str().contains('T'));
        assert!(Timestamp::parse(ts.as_str()).is_ok());
    }

    #[test]
    fn test_from_datetime_uses_micros() {
        let at = Utc.with_ymd_and_hms(2025, 11, 14, 10, 30, 0).unwrap();
        assert_eq!(
            Timestamp::from_datetime(at).as_str(),
            "2025-11-14T10:30:00.000000Z"
        );
    }

    #[test]
    fn test_parse_rejects_offsets() {
        assert!(Timestamp::parse("2025-11-14T10:30:00Z").is_ok());
        assert!(Timestamp::parse("2025-11-14T10:30:00+02:00").is_err());
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_to_datetime() {
        let ts = Timestamp::new("2025-11-14T10:30:00Z".into());
        let dt = ts.to_datetime().unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 11, 14, 10, 30, 0).unwrap());
        assert!(Timestamp::new("garbage".into()).to_datetime().is_none());
    }
}
