//! Time primitives for Epocha
//!
//! The whole system tracks one value, `EpochSeconds`. Everything a user sees
//! (locale string, UTC string, date field, time field, calendar) is derived
//! from it on demand.

use std::fmt;

use chrono::{NaiveTime, Timelike};

use crate::{EpochError, EpochResult};

/// Largest magnitude accepted for an instant, in seconds (about year ±255,000).
/// Every instant in range, shifted by any UTC offset, stays a valid calendar date.
pub const MAX_EPOCH_SECONDS: i64 = 8_000_000_000_000;

/// Canonical instant - whole seconds since 1970-01-01T00:00:00Z
/// INVARIANT: |value| <= MAX_EPOCH_SECONDS
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EpochSeconds(i64);

impl EpochSeconds {
    pub const MAX: EpochSeconds = EpochSeconds(MAX_EPOCH_SECONDS);
    pub const MIN: EpochSeconds = EpochSeconds(-MAX_EPOCH_SECONDS);

    /// Checked constructor
    #[inline]
    pub fn from_secs(secs: i64) -> Option<Self> {
        if (-MAX_EPOCH_SECONDS..=MAX_EPOCH_SECONDS).contains(&secs) {
            Some(EpochSeconds(secs))
        } else {
            None
        }
    }

    /// Clamp into the valid range
    #[inline]
    pub fn from_secs_saturating(secs: i64) -> Self {
        EpochSeconds(secs.clamp(-MAX_EPOCH_SECONDS, MAX_EPOCH_SECONDS))
    }

    /// Truncate a fractional second count (floor) and range check it
    pub fn from_f64(secs: f64) -> EpochResult<Self> {
        if !secs.is_finite() {
            return Err(EpochError::numeric(secs.to_string(), "not a finite number"));
        }
        let floored = secs.floor();
        if floored.abs() > MAX_EPOCH_SECONDS as f64 {
            return Err(EpochError::numeric(secs.to_string(), "outside the supported range"));
        }
        Ok(EpochSeconds(floored as i64))
    }

    #[inline]
    pub fn as_secs(self) -> i64 {
        self.0
    }

    /// Offset by a signed number of seconds, None when leaving the valid range
    #[inline]
    pub fn checked_add_secs(self, delta: i64) -> Option<Self> {
        self.0.checked_add(delta).and_then(Self::from_secs)
    }
}

impl fmt::Debug for EpochSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch({}s)", self.0)
    }
}

impl fmt::Display for EpochSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw value handed to an epoch edit
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EpochInput<'a> {
    /// Text typed into the epoch control
    Text(&'a str),
    /// A number that may carry a fraction or be non-finite
    Number(f64),
    /// A whole second count
    Seconds(i64),
}

impl EpochInput<'_> {
    /// Validate into an instant
    pub fn resolve(&self) -> EpochResult<EpochSeconds> {
        match *self {
            EpochInput::Text(text) => parse_epoch_text(text),
            EpochInput::Number(value) => EpochSeconds::from_f64(value),
            EpochInput::Seconds(secs) => EpochSeconds::from_secs(secs)
                .ok_or_else(|| EpochError::numeric(secs.to_string(), "outside the supported range")),
        }
    }
}

impl<'a> From<&'a str> for EpochInput<'a> {
    fn from(text: &'a str) -> Self {
        EpochInput::Text(text)
    }
}

impl<'a> From<&'a String> for EpochInput<'a> {
    fn from(text: &'a String) -> Self {
        EpochInput::Text(text.as_str())
    }
}

impl From<f64> for EpochInput<'_> {
    fn from(value: f64) -> Self {
        EpochInput::Number(value)
    }
}

impl From<i64> for EpochInput<'_> {
    fn from(secs: i64) -> Self {
        EpochInput::Seconds(secs)
    }
}

impl From<EpochSeconds> for EpochInput<'_> {
    fn from(instant: EpochSeconds) -> Self {
        EpochInput::Seconds(instant.as_secs())
    }
}

fn parse_epoch_text(text: &str) -> EpochResult<EpochSeconds> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EpochError::numeric(text, "empty input"));
    }

    // Integers first: f64 loses precision past 2^53
    if let Ok(secs) = trimmed.parse::<i64>() {
        return EpochSeconds::from_secs(secs)
            .ok_or_else(|| EpochError::numeric(text, "outside the supported range"));
    }

    let value = trimmed
        .parse::<f64>()
        .map_err(|_| EpochError::numeric(text, "not a number"))?;
    EpochSeconds::from_f64(value).map_err(|err| match err {
        EpochError::InvalidNumericInput { reason, .. } => EpochError::numeric(text, reason),
        other => other,
    })
}

/// Wall-clock time of day with whole-second precision
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Hour 0-23, minute 0-59, second 0-59
    pub fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour < 24 && minute < 60 && second < 60 {
            Some(TimeOfDay {
                hour,
                minute,
                second,
            })
        } else {
            None
        }
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn second(self) -> u8 {
        self.second
    }

    pub fn seconds_from_midnight(self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Drops any sub-second part; a leap second reads as :59
    pub fn from_naive_time(time: NaiveTime) -> Self {
        TimeOfDay {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second().min(59) as u8,
        }
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // components are range checked on construction
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({self})")
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_epoch_range() {
        assert!(EpochSeconds::from_secs(MAX_EPOCH_SECONDS).is_some());
        assert!(EpochSeconds::from_secs(MAX_EPOCH_SECONDS + 1).is_none());
        assert!(EpochSeconds::from_secs(-MAX_EPOCH_SECONDS - 1).is_none());
        assert_eq!(EpochSeconds::from_secs_saturating(i64::MAX), EpochSeconds::MAX);
        assert_eq!(EpochSeconds::from_secs_saturating(i64::MIN), EpochSeconds::MIN);
    }

    #[test]
    fn test_fraction_floors() {
        assert_eq!(EpochSeconds::from_f64(1.9).unwrap().as_secs(), 1);
        assert_eq!(EpochSeconds::from_f64(-0.5).unwrap().as_secs(), -1);
    }

    #[test]
    fn test_epoch_text_input() {
        let parse = |s: &str| EpochInput::from(s).resolve();

        assert_eq!(parse("1675639572").unwrap().as_secs(), 1_675_639_572);
        assert_eq!(parse("  42 ").unwrap().as_secs(), 42);
        assert_eq!(parse("-86400").unwrap().as_secs(), -86_400);
        assert_eq!(parse("1.5e3").unwrap().as_secs(), 1500);
        assert_eq!(parse("12.75").unwrap().as_secs(), 12);

        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
        assert!(parse("not-a-number").is_err());
        assert!(parse("NaN").is_err());
        assert!(parse("inf").is_err());
        assert!(parse("9000000000000").is_err());
        assert!(parse("12:30").is_err());
    }

    #[test]
    fn test_numeric_input() {
        assert!(EpochInput::from(f64::NAN).resolve().is_err());
        assert!(EpochInput::from(f64::NEG_INFINITY).resolve().is_err());
        assert!(EpochInput::from(i64::MAX).resolve().is_err());
        assert_eq!(EpochInput::from(7i64).resolve().unwrap().as_secs(), 7);
    }

    #[test]
    fn test_rejection_keeps_input_text() {
        match EpochInput::from(" 1e400 ").resolve() {
            Err(EpochError::InvalidNumericInput { input, .. }) => assert_eq!(input, " 1e400 "),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_time_of_day_bounds() {
        assert!(TimeOfDay::new(23, 59, 59).is_some());
        assert!(TimeOfDay::new(24, 0, 0).is_none());
        assert!(TimeOfDay::new(0, 60, 0).is_none());
        assert!(TimeOfDay::new(0, 0, 60).is_none());
        assert_eq!(TimeOfDay::new(7, 5, 3).unwrap().to_string(), "07:05:03");
    }

    proptest! {
        #[test]
        fn prop_integer_text_round_trips(secs in -MAX_EPOCH_SECONDS..=MAX_EPOCH_SECONDS) {
            let text = secs.to_string();
            prop_assert_eq!(EpochInput::from(text.as_str()).resolve().unwrap().as_secs(), secs);
        }

        #[test]
        fn prop_time_of_day_naive_round_trip(h in 0u8..24, m in 0u8..60, s in 0u8..60) {
            let tod = TimeOfDay::new(h, m, s).unwrap();
            prop_assert_eq!(TimeOfDay::from_naive_time(tod.to_naive_time()), tod);
            prop_assert_eq!(tod.seconds_from_midnight(), h as u32 * 3600 + m as u32 * 60 + s as u32);
        }
    }
}
