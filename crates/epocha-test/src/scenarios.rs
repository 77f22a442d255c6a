//! Shared fixtures for engine and session tests

use chrono::FixedOffset;
use chrono_tz::Tz;
use epocha_core::EpochSeconds;
use epocha_session::Session;
use epocha_time::{ManualClock, TimeState, TimeStateConfig};

/// 2023-02-05T23:26:12Z
pub const SAMPLE_EPOCH: i64 = 1_675_639_572;

/// US Central, the zone the reference scenarios are written against
pub const REFERENCE_ZONE: Tz = chrono_tz::America::Chicago;

pub fn instant(secs: i64) -> EpochSeconds {
    EpochSeconds::from_secs_saturating(secs)
}

/// Engine in US Central time on a manual clock
pub fn central_state(start: i64) -> (TimeState<Tz>, ManualClock) {
    let clock = ManualClock::new(instant(start));
    (TimeState::with_zone(REFERENCE_ZONE, clock.clone()), clock)
}

/// Mounted session in US Central time on a manual clock
pub fn central_session(start: i64) -> (Session<Tz>, ManualClock) {
    let (state, clock) = central_state(start);
    (Session::mount(state), clock)
}

/// Mounted session in a fixed-offset zone (no DST transitions)
pub fn fixed_session(
    utc_offset_secs: i32,
    start: i64,
    config: TimeStateConfig,
) -> Option<(Session<FixedOffset>, ManualClock)> {
    let zone = FixedOffset::east_opt(utc_offset_secs)?;
    let clock = ManualClock::new(instant(start));
    let state = TimeState::with_config(zone, clock.clone(), config);
    Some((Session::mount(state), clock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use epocha_session::Edit;

    #[test]
    fn test_reference_scenarios() {
        let (mut session, _) = central_session(0);
        session.dispatch(Edit::EpochValue(SAMPLE_EPOCH as f64)).unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.utc, "February 5, 2023 11:26:12 PM UTC");
        assert_eq!(snap.date_field, "2023-02-05");
        assert_eq!(snap.time_field, "17:26:12");

        session.dispatch(Edit::TimeField("18:35:10".into())).unwrap();
        assert_eq!(session.state().epoch_seconds(), 1_675_643_710);

        session.dispatch(Edit::DateField("2021-05-28".into())).unwrap();
        let epoch = session.state().epoch_seconds();
        assert!(epoch > 1_622_178_000 && epoch < 1_622_264_400);

        let before = session.snapshot();
        assert!(session.dispatch(Edit::Epoch("not-a-number".into())).is_err());
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_fixed_session_rejects_bad_offset() {
        assert!(fixed_session(90_000, 0, TimeStateConfig::default()).is_none());
        assert!(fixed_session(-3600, 0, TimeStateConfig::default()).is_some());
    }
}
