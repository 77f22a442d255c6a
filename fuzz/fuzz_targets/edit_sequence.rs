//! Fuzz harness for edit sequences against a mounted session.
//!
//! Each input decodes to a list of edits and visibility changes. After every
//! step the date and time fields must still describe the instant.

#![no_main]
use arbitrary::Arbitrary;
use chrono::{FixedOffset, NaiveDate};
use epocha_core::EpochSeconds;
use epocha_session::{Edit, Session, Visibility};
use epocha_time::{ManualClock, TimeState};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Epoch(String),
    EpochValue(f64),
    CalendarPick { year: i16, ordinal: u16 },
    DateField(String),
    TimeField(String),
    Hide,
    Show { advance: u32 },
    Browse(i8),
}

#[derive(Arbitrary, Debug)]
struct Input {
    offset_quarters: i8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let offset = i32::from(input.offset_quarters.clamp(-48, 56)) * 900;
    let Some(zone) = FixedOffset::east_opt(offset) else {
        return;
    };
    let clock = ManualClock::new(EpochSeconds::from_secs_saturating(1_675_639_572));
    let mut session = Session::mount(TimeState::with_zone(zone, clock.clone()));

    for op in input.ops {
        let revision = session.revision();
        let result = match op {
            Op::Epoch(text) => session.dispatch(Edit::Epoch(text)),
            Op::EpochValue(value) => session.dispatch(Edit::EpochValue(value)),
            Op::CalendarPick { year, ordinal } => {
                match NaiveDate::from_yo_opt(i32::from(year), u32::from(ordinal)) {
                    Some(date) => session.dispatch(Edit::CalendarPick(date)),
                    None => continue,
                }
            }
            Op::DateField(text) => session.dispatch(Edit::DateField(text)),
            Op::TimeField(text) => session.dispatch(Edit::TimeField(text)),
            Op::Hide => {
                session.visibility_changed(Visibility::Hidden);
                continue;
            }
            Op::Show { advance } => {
                clock.advance(i64::from(advance));
                session.visibility_changed(Visibility::Visible);
                continue;
            }
            Op::Browse(delta) => {
                session.browse_month(i32::from(delta));
                continue;
            }
        };

        if result.is_err() {
            assert_eq!(session.revision(), revision);
        }
        let snapshot = session.snapshot();
        assert_eq!(snapshot.epoch, session.state().epoch_seconds().to_string());
        assert!(!snapshot.date_field.is_empty());
        assert!(!snapshot.time_field.is_empty());
    }
});
