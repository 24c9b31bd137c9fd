//! Timestamp formatting utilities
//!
//! A line header carries an optional timestamp rendered from a
//! strftime-compatible format string. An empty format string means the
//! header has no timestamp at all.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

/// Timestamp format used in line headers
///
/// # Examples
///
/// ```
/// use rust_line_logger::TimestampFormat;
///
/// assert_eq!(TimestampFormat::from(""), TimestampFormat::None);
/// assert_eq!(
///     TimestampFormat::from("%Y-%m-%d"),
///     TimestampFormat::Custom("%Y-%m-%d".to_string())
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// No timestamp in the header
    #[default]
    None,

    /// RFC 3339 with offset: `2025-01-08T10:30:45+08:00`
    Rfc3339,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123+08:00`
    Iso8601Millis,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Render `datetime` according to this format.
    ///
    /// Returns `None` when no timestamp should be emitted, which includes
    /// custom formats chrono cannot render.
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> Option<String>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            TimestampFormat::None => None,
            TimestampFormat::Rfc3339 => Some(datetime.to_rfc3339()),
            TimestampFormat::Iso8601Millis => {
                Some(datetime.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string())
            }
            TimestampFormat::Unix => Some(datetime.timestamp().to_string()),
            TimestampFormat::UnixMillis => Some(datetime.timestamp_millis().to_string()),
            TimestampFormat::Custom(format_str) => {
                if format_str.is_empty() {
                    return None;
                }
                let mut rendered = String::with_capacity(format_str.len() + 16);
                // chrono reports unknown specifiers as a fmt::Error
                write!(rendered, "{}", datetime.format(format_str)).ok()?;
                Some(rendered)
            }
        }
    }

    /// Whether headers rendered with this format carry a timestamp
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        match self {
            TimestampFormat::None => false,
            TimestampFormat::Custom(format_str) => !format_str.is_empty(),
            _ => true,
        }
    }

    /// Check that a custom format string only uses specifiers chrono knows
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            TimestampFormat::Custom(format_str) => {
                !StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
            }
            _ => true,
        }
    }
}

impl From<&str> for TimestampFormat {
    fn from(format_str: &str) -> Self {
        if format_str.is_empty() {
            TimestampFormat::None
        } else {
            TimestampFormat::Custom(format_str.to_string())
        }
    }
}

impl From<String> for TimestampFormat {
    fn from(format_str: String) -> Self {
        if format_str.is_empty() {
            TimestampFormat::None
        } else {
            TimestampFormat::Custom(format_str)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_none_format() {
        assert_eq!(TimestampFormat::None.format(&fixed_datetime()), None);
        assert!(!TimestampFormat::None.is_enabled());
    }

    #[test]
    fn test_rfc3339_format() {
        let result = TimestampFormat::Rfc3339.format(&fixed_datetime()).unwrap();
        assert!(result.starts_with("2025-01-08T10:30:45"));
        assert!(result.contains("+00:00"));
    }

    #[test]
    fn test_iso8601_millis_format() {
        let result = TimestampFormat::Iso8601Millis
            .format(&fixed_datetime())
            .unwrap();
        assert_eq!(result, "2025-01-08T10:30:45.123+00:00");
    }

    #[test]
    fn test_unix_formats() {
        let secs: i64 = TimestampFormat::Unix
            .format(&fixed_datetime())
            .unwrap()
            .parse()
            .expect("valid unix timestamp");
        let millis: i64 = TimestampFormat::UnixMillis
            .format(&fixed_datetime())
            .unwrap()
            .parse()
            .expect("valid unix millis timestamp");
        assert_eq!(millis / 1000, secs);
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::from("%Y/%m/%d %H:%M");
        assert_eq!(
            format.format(&fixed_datetime()).as_deref(),
            Some("2025/01/08 10:30")
        );
    }

    #[test]
    fn test_invalid_custom_format_yields_no_timestamp() {
        let format = TimestampFormat::Custom("%Q %Y".to_string());
        assert!(!format.is_valid());
        assert_eq!(format.format(&fixed_datetime()), None);
    }

    #[test]
    fn test_empty_string_means_no_timestamp() {
        assert_eq!(TimestampFormat::from(String::new()), TimestampFormat::None);
        assert!(!TimestampFormat::Custom(String::new()).is_enabled());
    }

    #[test]
    fn test_deserialization() {
        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));

        let format: TimestampFormat = serde_json::from_str("\"None\"").expect("deserialize None");
        assert_eq!(format, TimestampFormat::None);
    }
}
