//! Date parsing for the before/after operators.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Turns a date string into a Unix timestamp in seconds.
pub trait TimestampParser {
    /// Returns `None` when the text is not a date this parser understands.
    fn parse(&self, text: &str) -> Option<i64>;
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD`, bare integer timestamps and `now`. Naive times are UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTimestampParser;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

impl TimestampParser for DefaultTimestampParser {
    fn parse(&self, text: &str) -> Option<i64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(seconds) = text.parse::<i64>() {
            return Some(seconds);
        }
        if text.eq_ignore_ascii_case("now") {
            return Some(Utc::now().timestamp());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.timestamp());
        }
        for format in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(dt.and_utc().timestamp());
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
    }
}

impl<F> TimestampParser for F
where
    F: Fn(&str) -> Option<i64>,
{
    fn parse(&self, text: &str) -> Option<i64> {
        self(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let parser = DefaultTimestampParser;
        assert_eq!(parser.parse("1970-01-02"), Some(86_400));
        assert_eq!(parser.parse("1970-01-01 00:01:00"), Some(60));
        assert_eq!(parser.parse("1970-01-01T00:00:10"), Some(10));
        assert_eq!(parser.parse("1970-01-01T01:00:00+01:00"), Some(0));
        assert_eq!(parser.parse("1234"), Some(1234));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let parser = DefaultTimestampParser;
        assert_eq!(parser.parse("yesterday-ish"), None);
        assert_eq!(parser.parse(""), None);
        assert_eq!(parser.parse("2024-13-01"), None);
    }

    #[test]
    fn test_closure_parser() {
        let fixed = |_: &str| -> Option<i64> { Some(42) };
        assert_eq!(fixed.parse("anything"), Some(42));
    }
}
