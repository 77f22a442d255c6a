//! Strict parsers for the date and time fields
//!
//! Both fields are machine formats (`YYYY-MM-DD`, `HH:MM:SS`) rather than
//! human strings, so parsing is exact: anything that does not match the
//! pattern, or names a component outside its natural range, is rejected
//! instead of rolling over into a neighbouring day or month.

use chrono::NaiveDate;

use crate::{EpochError, EpochResult, FieldKind, TimeOfDay};

/// Parse a `YYYY-MM-DD` date field value.
///
/// Surrounding whitespace is ignored. An empty value is not handled here;
/// callers treat it as "no edit".
pub fn parse_date_field(text: &str) -> EpochResult<NaiveDate> {
    let reject = |reason| EpochError::parse(FieldKind::Date, text, reason);

    let mut parts = text.trim().split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(reject("expected YYYY-MM-DD"));
    };

    let year = digits(year, 4, 4).ok_or_else(|| reject("year must be four digits"))?;
    let month = digits(month, 2, 2).ok_or_else(|| reject("month must be two digits"))?;
    let day = digits(day, 2, 2).ok_or_else(|| reject("day must be two digits"))?;

    if !(1..=12).contains(&month) {
        return Err(reject("month out of range"));
    }

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| reject("no such day"))
}

/// Parse an `HH:MM:SS` time field value.
///
/// Each component takes one or two ASCII digits. Fewer or more than three
/// components, or a value outside hour 0-23 / minute 0-59 / second 0-59,
/// is rejected.
pub fn parse_time_field(text: &str) -> EpochResult<TimeOfDay> {
    let reject = |reason| EpochError::parse(FieldKind::Time, text, reason);

    let components: Vec<&str> = text.trim().split(':').collect();
    if components.len() != 3 {
        return Err(reject("expected HH:MM:SS"));
    }

    let mut values = [0u8; 3];
    for (slot, component) in values.iter_mut().zip(&components) {
        *slot = digits(component, 1, 2).ok_or_else(|| reject("component is not numeric"))? as u8;
    }

    let [hour, minute, second] = values;
    if hour > 23 {
        return Err(reject("hour out of range"));
    }
    if minute > 59 {
        return Err(reject("minute out of range"));
    }
    TimeOfDay::new(hour, minute, second).ok_or_else(|| reject("second out of range"))
}

/// Unsigned decimal made of `min..=max` ASCII digits
fn digits(s: &str, min: usize, max: usize) -> Option<u32> {
    if s.len() < min || s.len() > max || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_date_field() {
        assert_eq!(
            parse_date_field("2021-05-28").unwrap(),
            NaiveDate::from_ymd_opt(2021, 5, 28).unwrap()
        );
        assert_eq!(
            parse_date_field(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_parse_date_field_rejects() {
        for bad in [
            "2021-5-28",
            "21-05-28",
            "2021/05/28",
            "2021-05-28-01",
            "2021-13-01",
            "2021-00-10",
            "2023-02-29",
            "2021-05-00",
            "2021-05",
            "+2021-05-28",
            "２０２１-05-28",
            "abcd-ef-gh",
        ] {
            match parse_date_field(bad) {
                Err(EpochError::ParseError { field, .. }) => assert_eq!(field, FieldKind::Date),
                other => panic!("{bad:?} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_time_field() {
        assert_eq!(parse_time_field("18:35:10").unwrap(), TimeOfDay::new(18, 35, 10).unwrap());
        assert_eq!(parse_time_field("0:0:0").unwrap(), TimeOfDay::MIDNIGHT);
        assert_eq!(parse_time_field("23:59:59").unwrap(), TimeOfDay::new(23, 59, 59).unwrap());
    }

    #[test]
    fn test_parse_time_field_rejects() {
        for bad in [
            "99:99:99", "24:00:00", "12:60:00", "12:00:60", "12:30", "12", "12:30:00:00",
            "aa:bb:cc", "12:-1:00", "12:+1:00", "123:00:00", "12::00", "", "12:30:0x",
        ] {
            match parse_time_field(bad) {
                Err(EpochError::ParseError { field, .. }) => assert_eq!(field, FieldKind::Time),
                other => panic!("{bad:?} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_range_reason_names_component() {
        match parse_time_field("23:61:00") {
            Err(EpochError::ParseError { reason, .. }) => assert_eq!(reason, "minute out of range"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_valid_dates_parse(y in 1000i32..=9999, ordinal in 1u32..=365) {
            let date = NaiveDate::from_yo_opt(y, ordinal).unwrap();
            let text = date.format("%Y-%m-%d").to_string();
            prop_assert_eq!(parse_date_field(&text).unwrap(), date);
        }

        #[test]
        fn prop_time_parser_never_panics(s in "\\PC*") {
            let _ = parse_time_field(&s);
            let _ = parse_date_field(&s);
        }
    }
}
