//! Date formatter capability and the chrono-backed formatters.

use chrono::format::{Item, StrftimeItems};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc,
};

use crate::error::CodexError;

/// Converts between dates and their string representation.
///
/// Implementations must be pure: the same instance maps the same input to the
/// same output.
pub trait DateFormatter {
    fn date_from(&self, string: &str) -> Option<DateTime<Utc>>;

    fn string_from(&self, date: &DateTime<Utc>) -> String;
}

impl<F: DateFormatter + ?Sized> DateFormatter for &F {
    fn date_from(&self, string: &str) -> Option<DateTime<Utc>> {
        (**self).date_from(string)
    }

    fn string_from(&self, date: &DateTime<Utc>) -> String {
        (**self).string_from(date)
    }
}

/// Formatter driven by a strftime-style pattern in a fixed UTC offset.
///
/// Patterns without a time component (such as `%Y-%m-%d`) parse to midnight
/// in the formatter's offset. When the pattern carries `%z` or `%:z`, the offset
/// written in the input wins over the formatter's own.
///
/// ```
/// use codex::{DateFormatter, PatternDateFormatter};
///
/// let formatter = PatternDateFormatter::new("%Y-%m-%d").unwrap();
/// let date = formatter.date_from("2020-11-30").unwrap();
/// assert_eq!(formatter.string_from(&date), "2020-11-30");
///
/// assert!(PatternDateFormatter::new("%Y-%Q").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PatternDateFormatter {
    pattern: String,
    offset: FixedOffset,
}

impl PatternDateFormatter {
    /// Formatter for `pattern` in UTC.
    ///
    /// # Errors
    /// Returns [`CodexError::InvalidDatePattern`] if the pattern has an unknown
    /// or malformed specifier.
    pub fn new(pattern: impl Into<String>) -> Result<Self, CodexError> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(CodexError::InvalidDatePattern { pattern });
        }

        Ok(Self {
            pattern,
            offset: Utc.fix(),
        })
    }

    /// Same pattern, read and written in `offset` instead of UTC.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// The strftime pattern this formatter reads and writes.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|date| date.with_timezone(&Utc))
    }
}

impl Default for PatternDateFormatter {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            offset: Utc.fix(),
        }
    }
}

impl DateFormatter for PatternDateFormatter {
    fn date_from(&self, string: &str) -> Option<DateTime<Utc>> {
        if let Ok(date) = DateTime::parse_from_str(string, &self.pattern) {
            return Some(date.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(string, &self.pattern) {
            return self.localize(naive);
        }
        let date = NaiveDate::parse_from_str(string, &self.pattern).ok()?;
        self.localize(date.and_hms_opt(0, 0, 0)?)
    }

    fn string_from(&self, date: &DateTime<Utc>) -> String {
        // Pattern was validated in `new`.
        date.with_timezone(&self.offset)
            .format(&self.pattern)
            .to_string()
    }
}

/// RFC 3339 formatter writing whole seconds in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso8601DateFormatter;

impl DateFormatter for Iso8601DateFormatter {
    fn date_from(&self, string: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(string)
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }

    fn string_from(&self, date: &DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_formatter_date_only() {
        let formatter = PatternDateFormatter::new("%Y-%m-%d").unwrap();
        let date = formatter.date_from("2014-06-02").unwrap();

        assert_eq!(date, Utc.with_ymd_and_hms(2014, 6, 2, 0, 0, 0).unwrap());
        assert_eq!(formatter.string_from(&date), "2014-06-02");
    }

    #[test]
    fn test_pattern_formatter_with_offset() {
        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        let formatter = PatternDateFormatter::new("%Y-%m-%d %H:%M")
            .unwrap()
            .with_offset(offset);

        let date = formatter.date_from("2020-11-30 12:00").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2020, 11, 30, 9, 0, 0).unwrap());
        assert_eq!(formatter.string_from(&date), "2020-11-30 12:00");
    }

    #[test]
    fn test_pattern_formatter_rejects_mismatched_input() {
        let formatter = PatternDateFormatter::new("%Y-%m-%d").unwrap();
        assert!(formatter.date_from("releaseDate").is_none());

        let blank = PatternDateFormatter::default();
        assert!(blank.date_from("releaseDate").is_none());
    }

    #[test]
    fn test_pattern_formatter_honors_input_offset() {
        let formatter = PatternDateFormatter::new("%Y-%m-%dT%H:%M:%S%z").unwrap();
        let date = formatter.date_from("2020-01-01T10:00:00+0300").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2020, 1, 1, 7, 0, 0).unwrap());

        let shifted = formatter
            .clone()
            .with_offset(FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(shifted.date_from("2020-01-01T10:00:00+0300"), Some(date));
        assert_eq!(shifted.string_from(&date), "2020-01-01T02:00:00-0500");
    }

    #[test]
    fn test_pattern_formatter_rejects_invalid_pattern() {
        let err = PatternDateFormatter::new("%Y-%Q").unwrap_err();
        assert!(matches!(
            err,
            CodexError::InvalidDatePattern { ref pattern } if pattern == "%Y-%Q"
        ));

        assert!(PatternDateFormatter::new("%Y-%m-%d %H:%M").is_ok());
        assert_eq!(PatternDateFormatter::default().string_from(&Utc::now()), "");
    }

    #[test]
    fn test_iso8601_formatter_truncates_to_seconds() {
        let formatter = Iso8601DateFormatter;
        let date = Utc.with_ymd_and_hms(2021, 3, 25, 8, 30, 15).unwrap()
            + chrono::Duration::milliseconds(250);

        let string = formatter.string_from(&date);
        assert_eq!(string, "2021-03-25T08:30:15Z");

        let parsed = formatter.date_from(&string).unwrap();
        assert_eq!(formatter.string_from(&parsed), string);
        assert_ne!(parsed, date);
    }

    #[test]
    fn test_iso8601_formatter_accepts_offsets() {
        let parsed = Iso8601DateFormatter.date_from("2021-03-25T10:30:15+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2021, 3, 25, 8, 30, 15).unwrap());
    }
}
