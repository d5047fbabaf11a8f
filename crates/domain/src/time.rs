//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for poll results, command times, and notifications.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Serde helpers encoding a [`std::time::Duration`] as whole milliseconds.
pub mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as an integer number of milliseconds.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    /// Deserialize from an integer number of milliseconds.
    ///
    /// # Errors
    ///
    /// Fails when the input is not an unsigned integer.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[derive(Serialize, Deserialize)]
    struct Window {
        #[serde(with = "duration_ms")]
        span: Duration,
    }

    #[test]
    fn should_encode_duration_as_milliseconds() {
        let json = serde_json::to_string(&Window {
            span: Duration::from_secs(5),
        })
        .unwrap();
        assert_eq!(json, r#"{"span":5000}"#);
    }

    #[test]
    fn should_decode_duration_from_milliseconds() {
        let window: Window = serde_json::from_str(r#"{"span":3000}"#).unwrap();
        assert_eq!(window.span, Duration::from_millis(3000));
    }
}
