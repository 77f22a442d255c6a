//! Display formatting for derived views

use std::fmt::{self, Write as _};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use epocha_core::{EpochError, EpochResult};

/// `February 5, 2023 5:26:12 PM CST`
pub const LOCALE_PATTERN: &str = "%B %-d, %Y %-I:%M:%S %p %Z";
/// `February 5, 2023 11:26:12 PM UTC`
pub const UTC_PATTERN: &str = "%B %-d, %Y %-I:%M:%S %p UTC";
/// `2023-02-05`
pub const DATE_FIELD_PATTERN: &str = "%Y-%m-%d";
/// `17:26:12`
pub const TIME_FIELD_PATTERN: &str = "%H:%M:%S";

/// Format a datetime with a strftime pattern.
///
/// Writes through `fmt::Write` so a pattern chrono cannot render comes back
/// as `FormattingFailure` rather than a panic from `to_string()`.
pub fn format_datetime<Tz>(datetime: &DateTime<Tz>, pattern: &str) -> EpochResult<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", datetime.format(pattern)).map_err(|_| EpochError::FormattingFailure {
        pattern: pattern.to_string(),
    })?;
    Ok(out)
}

/// Check that every specifier in a pattern is understood
pub fn check_pattern(pattern: &str) -> EpochResult<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(EpochError::InvalidConfig(format!(
            "unsupported format pattern {pattern:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_utc_pattern() {
        assert_eq!(
            format_datetime(&at(1_675_639_572), UTC_PATTERN).unwrap(),
            "February 5, 2023 11:26:12 PM UTC"
        );
        assert_eq!(
            format_datetime(&at(0), UTC_PATTERN).unwrap(),
            "January 1, 1970 12:00:00 AM UTC"
        );
    }

    #[test]
    fn test_fixed_offset_locale_pattern() {
        let central = FixedOffset::west_opt(6 * 3600).unwrap();
        let dt = at(1_675_639_572).with_timezone(&central);
        assert_eq!(
            format_datetime(&dt, LOCALE_PATTERN).unwrap(),
            "February 5, 2023 5:26:12 PM -06:00"
        );
        assert_eq!(format_datetime(&dt, DATE_FIELD_PATTERN).unwrap(), "2023-02-05");
        assert_eq!(format_datetime(&dt, TIME_FIELD_PATTERN).unwrap(), "17:26:12");
    }

    #[test]
    fn test_named_zone_abbreviation() {
        let dt = at(1_675_639_572).with_timezone(&chrono_tz::America::Chicago);
        assert_eq!(
            format_datetime(&dt, LOCALE_PATTERN).unwrap(),
            "February 5, 2023 5:26:12 PM CST"
        );
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        assert!(matches!(
            format_datetime(&at(0), "%Q"),
            Err(EpochError::FormattingFailure { .. })
        ));
        assert!(check_pattern("%Q").is_err());
        for pattern in [LOCALE_PATTERN, UTC_PATTERN, DATE_FIELD_PATTERN, TIME_FIELD_PATTERN] {
            assert!(check_pattern(pattern).is_ok());
        }
    }
}
