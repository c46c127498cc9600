//! Serde utilities for Scrapbook feed records.

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::Deserializer;
use std::fmt;

/// Lenient deserialization of optional Unix-epoch timestamps.
///
/// The feed has served timestamps as integers, floats and numeric strings
/// over time, and older posts carry an RFC 3339 `postedAt`. Anything that
/// cannot be interpreted becomes `None` instead of failing the whole feed.
pub mod epoch_seconds {
    use super::{de, fmt, DateTime, Deserializer, Utc, Visitor};

    /// Deserializes an optional timestamp from a number or string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a number, a string nor null.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TimestampVisitor;

        impl<'de> Visitor<'de> for TimestampVisitor {
            type Value = Option<DateTime<Utc>>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a Unix timestamp in seconds or an RFC 3339 string")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(DateTime::from_timestamp(value, 0))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(i64::try_from(value)
                    .ok()
                    .and_then(|secs| DateTime::from_timestamp(secs, 0)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(from_fractional_seconds(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(parse_str(value))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }
        }

        deserializer.deserialize_option(TimestampVisitor)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_fractional_seconds(value: f64) -> Option<DateTime<Utc>> {
        if !value.is_finite() {
            return None;
        }
        let secs = value.trunc();
        if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
            return None;
        }
        let nanos = ((value - secs).abs() * 1_000_000_000.0) as u32;
        DateTime::from_timestamp(secs as i64, nanos)
    }

    fn parse_str(value: &str) -> Option<DateTime<Utc>> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(secs) = trimmed.parse::<i64>() {
            return DateTime::from_timestamp(secs, 0);
        }
        if let Ok(secs) = trimmed.parse::<f64>() {
            return from_fractional_seconds(secs);
        }
        DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
