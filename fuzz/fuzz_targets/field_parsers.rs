//! Fuzz harness for the text inputs of the time-state engine.
//!
//! Arbitrary bytes, read as UTF-8, go through the date, time and epoch
//! parsers and then through the engine write path. Nothing may panic, and a
//! rejected write must leave the instant where it was.

#![no_main]
use chrono::FixedOffset;
use epocha_core::{parse_date_field, parse_time_field, EpochInput, EpochSeconds};
use epocha_time::{ManualClock, TimeState};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(date) = parse_date_field(text) {
        assert_eq!(date.format("%Y-%m-%d").to_string(), text.trim());
    }
    if let Ok(time) = parse_time_field(text) {
        assert!(time.seconds_from_midnight() < 86_400);
    }
    let _ = EpochInput::from(text).resolve();

    let Some(zone) = FixedOffset::east_opt(-6 * 3600) else {
        return;
    };
    let clock = ManualClock::new(EpochSeconds::from_secs_saturating(1_675_639_572));
    let mut state = TimeState::with_zone(zone, clock);

    let before = state.instant();
    if state.set_from_epoch(text).is_err() {
        assert_eq!(state.instant(), before);
    }

    let before = state.instant();
    if state.set_from_date_field(text).is_err() {
        assert_eq!(state.instant(), before);
    }

    let before = state.instant();
    if state.set_from_time_field(text).is_err() {
        assert_eq!(state.instant(), before);
    }

    let _ = state.locale_string();
    let _ = state.utc_string();
    let _ = state.date_field();
    let _ = state.time_field();
});
