use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

static TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d{1,2})(\.\d+)?$").unwrap());

/// Parses an `mm:ss` or `mm:ss.ss` timestamp into seconds.
pub fn parse_timestamp(text: &str) -> Result<f64, ValidationError> {
    let bad = || ValidationError::BadTimestamp(text.to_string());
    let caps = TIMESTAMP.captures(text.trim()).ok_or_else(bad)?;

    let minutes: f64 = caps[1].parse().map_err(|_| bad())?;
    let seconds: f64 = caps[2].parse().map_err(|_| bad())?;
    let fraction: f64 = match caps.get(3) {
        Some(m) => m.as_str().parse().map_err(|_| bad())?,
        None => 0.0,
    };

    Ok(minutes * 60.0 + seconds + fraction)
}

/// Inclusive extraction window [start, end] in seconds within the source video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::EmptyRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_seconds() {
        assert_eq!(parse_timestamp("01:30").unwrap(), 90.0);
        assert_eq!(parse_timestamp("00:00").unwrap(), 0.0);
        assert_eq!(parse_timestamp("10:05").unwrap(), 605.0);
    }

    #[test]
    fn parses_fractional_seconds() {
        assert_eq!(parse_timestamp("00:05.50").unwrap(), 5.5);
        assert_eq!(parse_timestamp("02:03.25").unwrap(), 123.25);
    }

    #[test]
    fn rejects_bad_formats() {
        for bad in ["", "90", "1:2:3", "01:30xyz", "ab:cd", "-1:00", "01:30.", ":30"] {
            assert!(parse_timestamp(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn range_requires_end_after_start() {
        assert!(TimeRange::new(0.0, 1.0).is_ok());
        assert!(TimeRange::new(5.0, 5.0).is_err());
        assert!(TimeRange::new(5.0, 4.0).is_err());
        assert!(TimeRange::parse("00:10", "00:05").is_err());
    }

    #[test]
    fn range_parses_both_endpoints() {
        let range = TimeRange::parse("00:05.50", "01:30").unwrap();
        assert_eq!(range.start, 5.5);
        assert_eq!(range.end, 90.0);
    }
}
