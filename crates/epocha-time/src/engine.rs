//! TimeState Engine - one canonical instant behind six synchronized views

use std::fmt;

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc, Weekday,
};
use epocha_core::{
    parse_date_field, parse_time_field, EpochError, EpochInput, EpochResult, EpochSeconds,
    TimeOfDay,
};
use tracing::{debug, warn};

use crate::{
    check_pattern, format_datetime, host_zone, CalendarSelection, Clock, SystemClock,
    DATE_FIELD_PATTERN, LOCALE_PATTERN, TIME_FIELD_PATTERN, UTC_PATTERN,
};

/// TimeState configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeStateConfig {
    /// strftime pattern for the local display string
    pub locale_pattern: String,
    /// strftime pattern for the UTC display string
    pub utc_pattern: String,
    /// First column of the calendar grid
    pub week_start: Weekday,
}

impl Default for TimeStateConfig {
    fn default() -> Self {
        TimeStateConfig {
            locale_pattern: LOCALE_PATTERN.to_string(),
            utc_pattern: UTC_PATTERN.to_string(),
            week_start: Weekday::Sun,
        }
    }
}

impl TimeStateConfig {
    /// ISO-8601 display strings, Monday-first calendar
    pub fn iso() -> Self {
        TimeStateConfig {
            locale_pattern: "%Y-%m-%dT%H:%M:%S%:z".to_string(),
            utc_pattern: "%Y-%m-%dT%H:%M:%SZ".to_string(),
            week_start: Weekday::Mon,
        }
    }

    /// Reject display patterns chrono cannot render
    pub fn validate(&self) -> EpochResult<()> {
        check_pattern(&self.locale_pattern)?;
        check_pattern(&self.utc_pattern)
    }
}

/// TimeState - the canonical instant and everything derived from it
///
/// `Tz` is the zone that defines "local time" for the locale string, the
/// date and time fields and the calendar.
pub struct TimeState<Tz: TimeZone> {
    /// Canonical instant
    instant: EpochSeconds,
    /// Zone used for local views
    zone: Tz,
    /// Source of "now"
    clock: Box<dyn Clock>,
    /// Configuration
    config: TimeStateConfig,
}

impl TimeState<chrono_tz::Tz> {
    /// Host zone (looked up by name), system clock, default configuration
    pub fn new() -> Self {
        Self::with_zone(host_zone(), SystemClock)
    }
}

impl Default for TimeState<chrono_tz::Tz> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz> TimeState<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    /// Create a TimeState positioned at the clock's current time
    pub fn with_zone(zone: Tz, clock: impl Clock + 'static) -> Self {
        Self::with_config(zone, clock, TimeStateConfig::default())
    }

    /// Create a TimeState with custom configuration
    pub fn with_config(zone: Tz, clock: impl Clock + 'static, config: TimeStateConfig) -> Self {
        let instant = clock.now();
        debug!(instant = instant.as_secs(), "time state mounted");
        TimeState {
            instant,
            zone,
            clock: Box::new(clock),
            config,
        }
    }

    // ---- Reads -------------------------------------------------------------

    /// Canonical instant
    pub fn instant(&self) -> EpochSeconds {
        self.instant
    }

    /// Canonical instant as a second count
    pub fn epoch_seconds(&self) -> i64 {
        self.instant.as_secs()
    }

    pub fn zone(&self) -> &Tz {
        &self.zone
    }

    pub fn config(&self) -> &TimeStateConfig {
        &self.config
    }

    /// Instant in the local zone
    pub fn local_datetime(&self) -> Option<DateTime<Tz>> {
        self.zone.timestamp_opt(self.instant.as_secs(), 0).single()
    }

    /// Instant in UTC
    pub fn utc_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.instant.as_secs(), 0)
    }

    pub fn local_date(&self) -> Option<NaiveDate> {
        self.local_datetime().map(|dt| dt.date_naive())
    }

    pub fn local_time_of_day(&self) -> Option<TimeOfDay> {
        self.local_datetime()
            .map(|dt| TimeOfDay::from_naive_time(dt.time()))
    }

    /// `February 5, 2023 5:26:12 PM CST`, or empty when formatting fails
    pub fn locale_string(&self) -> String {
        self.render_local(&self.config.locale_pattern)
    }

    /// `February 5, 2023 11:26:12 PM UTC`, or empty when formatting fails
    pub fn utc_string(&self) -> String {
        let Some(utc) = self.utc_datetime() else {
            warn!(instant = self.instant.as_secs(), "instant has no UTC datetime");
            return String::new();
        };
        render(&utc, &self.config.utc_pattern)
    }

    /// Local date as `YYYY-MM-DD`
    pub fn date_field(&self) -> String {
        self.render_local(DATE_FIELD_PATTERN)
    }

    /// Local time as `HH:MM:SS`
    pub fn time_field(&self) -> String {
        self.render_local(TIME_FIELD_PATTERN)
    }

    /// Local date plus the month a picker should show
    pub fn calendar_selection(&self) -> CalendarSelection {
        let date = self
            .local_date()
            .or_else(|| self.utc_datetime().map(|dt| dt.date_naive()))
            .unwrap_or_default();
        CalendarSelection::of(date)
    }

    fn render_local(&self, pattern: &str) -> String {
        let Some(local) = self.local_datetime() else {
            warn!(instant = self.instant.as_secs(), "instant has no local datetime");
            return String::new();
        };
        render(&local, pattern)
    }

    // ---- Writes ------------------------------------------------------------

    /// Replace the instant with a raw epoch value.
    /// Invalid input leaves the instant unchanged.
    pub fn set_from_epoch<'a>(&mut self, input: impl Into<EpochInput<'a>>) -> EpochResult<()> {
        let input = input.into();
        let next = input.resolve().map_err(|err| rejected("epoch", err))?;
        self.commit(next, "epoch");
        Ok(())
    }

    /// Replace year/month/day with a picked date, keeping the local time of day
    pub fn set_from_calendar_pick(&mut self, date: NaiveDate) -> EpochResult<()> {
        let time = self.current_time_of_day();
        let next = self
            .resolve_local(date, time)
            .map_err(|err| rejected("calendar", err))?;
        self.commit(next, "calendar");
        Ok(())
    }

    /// Replace year/month/day from a `YYYY-MM-DD` field.
    /// Empty or blank input is not an edit.
    pub fn set_from_date_field(&mut self, text: &str) -> EpochResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let date = parse_date_field(text).map_err(|err| rejected("date field", err))?;
        let time = self.current_time_of_day();
        let next = self
            .resolve_local(date, time)
            .map_err(|err| rejected("date field", err))?;
        self.commit(next, "date field");
        Ok(())
    }

    /// Replace hour/minute/second from an `HH:MM:SS` field, keeping the local date.
    /// Empty or blank input is not an edit.
    pub fn set_from_time_field(&mut self, text: &str) -> EpochResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let time = parse_time_field(text).map_err(|err| rejected("time field", err))?;
        let date = self.calendar_selection().selected;
        let next = self
            .resolve_local(date, time)
            .map_err(|err| rejected("time field", err))?;
        self.commit(next, "time field");
        Ok(())
    }

    /// Re-synchronize to the clock.
    /// Driven by the visibility signal, never by user input.
    pub fn refresh_to_now(&mut self) {
        let now = self.clock.now();
        self.commit(now, "refresh");
    }

    fn commit(&mut self, next: EpochSeconds, source: &'static str) {
        debug!(
            source,
            from = self.instant.as_secs(),
            to = next.as_secs(),
            "instant updated"
        );
        self.instant = next;
    }

    fn current_time_of_day(&self) -> TimeOfDay {
        self.local_time_of_day().unwrap_or(TimeOfDay::MIDNIGHT)
    }

    /// Map a local wall-clock reading to an instant
    ///
    /// Ambiguous readings (clock rolled back) take the earlier instant.
    /// Readings inside a forward gap are read with the offset in force before
    /// the gap, which places them after it (02:30 in a 02:00-03:00 gap is 03:30).
    /// A gap that would carry the reading onto another date is rejected.
    fn resolve_local(&self, date: NaiveDate, time: TimeOfDay) -> EpochResult<EpochSeconds> {
        let out_of_range = || EpochError::DateOutOfRange { date };
        let naive = date.and_time(time.to_naive_time());

        let secs = match self.zone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.timestamp(),
            LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
            LocalResult::None => {
                let secs = self.resolve_gap(naive).ok_or_else(out_of_range)?;
                let landed = self.zone.timestamp_opt(secs, 0).single();
                if landed.map(|dt| dt.date_naive()) != Some(date) {
                    return Err(EpochError::NonexistentDate { date });
                }
                secs
            }
        };

        EpochSeconds::from_secs(secs).ok_or_else(out_of_range)
    }

    fn resolve_gap(&self, naive: NaiveDateTime) -> Option<i64> {
        let day_before = naive.checked_sub_signed(TimeDelta::days(1))?;
        let offset = self.zone.offset_from_utc_datetime(&day_before).fix();
        let utc = naive.checked_sub_signed(TimeDelta::seconds(offset.local_minus_utc() as i64))?;
        Some(utc.and_utc().timestamp())
    }
}

fn rejected(source: &'static str, err: EpochError) -> EpochError {
    debug!(source, error = %err, "edit rejected");
    err
}

fn render<Tz>(datetime: &DateTime<Tz>, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format_datetime(datetime, pattern).unwrap_or_else(|err| {
        warn!(error = %err, "display formatting failed");
        String::new()
    })
}
