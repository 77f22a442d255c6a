//! View session - routes tagged edits and host signals into a TimeState

use std::fmt;

use chrono::TimeZone;
use epocha_core::EpochResult;
use epocha_time::{CalendarSelection, MonthGrid, TimeState, YearMonth};
use tracing::{debug, info};

use crate::{Edit, FocusRequest, Representation, Visibility};

/// Everything a view renders, read in one pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Incremented after every successful edit or refresh
    pub revision: u64,
    pub epoch: String,
    pub locale: String,
    pub utc: String,
    pub calendar: CalendarSelection,
    pub date_field: String,
    pub time_field: String,
}

impl Snapshot {
    /// Text shown by a representation (the calendar shows its selected day)
    pub fn text(&self, representation: Representation) -> String {
        match representation {
            Representation::Epoch => self.epoch.clone(),
            Representation::LocaleString => self.locale.clone(),
            Representation::UtcString => self.utc.clone(),
            Representation::Calendar => self.calendar.selected.format("%Y-%m-%d").to_string(),
            Representation::DateField => self.date_field.clone(),
            Representation::TimeField => self.time_field.clone(),
        }
    }
}

/// One mounted view over one TimeState
pub struct Session<Tz: TimeZone> {
    /// Engine
    state: TimeState<Tz>,
    /// Render generation
    revision: u64,
    /// Last visibility reported by the host
    hidden: bool,
    /// Control holding input focus
    focus: FocusRequest,
    /// Calendar paging relative to the instant's month
    browse_offset: i32,
}

impl<Tz> Session<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    /// Mount a view: the epoch control takes focus with its content selected
    pub fn mount(state: TimeState<Tz>) -> Self {
        info!(instant = state.epoch_seconds(), "session mounted");
        Session {
            state,
            revision: 0,
            hidden: false,
            focus: FocusRequest::on(Representation::Epoch),
            browse_offset: 0,
        }
    }

    pub fn state(&self) -> &TimeState<Tz> {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Control that currently holds focus
    pub fn focus(&self) -> FocusRequest {
        self.focus
    }

    /// Apply a user edit.
    /// On error nothing changes, including the revision.
    pub fn dispatch(&mut self, edit: Edit) -> EpochResult<()> {
        let origin = edit.representation();
        let applied = match edit {
            Edit::Epoch(text) => self.state.set_from_epoch(text.as_str()),
            Edit::EpochValue(value) => self.state.set_from_epoch(value),
            Edit::CalendarPick(date) => self.state.set_from_calendar_pick(date),
            Edit::DateField(text) => self.state.set_from_date_field(&text),
            Edit::TimeField(text) => self.state.set_from_time_field(&text),
        };
        applied?;
        self.touch();
        debug!(%origin, revision = self.revision, "edit applied");
        Ok(())
    }

    /// Host visibility changed.
    ///
    /// Coming back from hidden refreshes the instant to now and returns focus
    /// to the epoch control. Becoming hidden, or a repeated visible signal,
    /// changes nothing.
    pub fn visibility_changed(&mut self, visibility: Visibility) -> Option<FocusRequest> {
        match visibility {
            Visibility::Hidden => {
                self.hidden = true;
                None
            }
            Visibility::Visible if !self.hidden => None,
            Visibility::Visible => {
                self.hidden = false;
                self.state.refresh_to_now();
                self.touch();
                let request = self.focus_on(Representation::Epoch);
                info!(instant = self.state.epoch_seconds(), "refreshed on visibility");
                Some(request)
            }
        }
    }

    /// Move focus to a control
    pub fn focus_on(&mut self, target: Representation) -> FocusRequest {
        self.focus = FocusRequest::on(target);
        self.focus
    }

    /// Read every representation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            epoch: self.state.epoch_seconds().to_string(),
            locale: self.state.locale_string(),
            utc: self.state.utc_string(),
            calendar: self.state.calendar_selection(),
            date_field: self.state.date_field(),
            time_field: self.state.time_field(),
        }
    }

    /// Month the calendar shows, after any paging
    pub fn visible_month(&self) -> YearMonth {
        self.state
            .calendar_selection()
            .visible_month
            .offset(self.browse_offset)
    }

    /// Page the calendar without touching the instant
    pub fn browse_month(&mut self, delta: i32) -> YearMonth {
        let anchor = self.state.calendar_selection().visible_month;
        let target = anchor.offset(self.browse_offset.saturating_add(delta));
        self.browse_offset = months_between(anchor, target);
        target
    }

    /// Day grid for the visible month, with the instant's day selected
    pub fn calendar_grid(&self) -> MonthGrid {
        let selection = self.state.calendar_selection();
        MonthGrid::build(
            self.visible_month(),
            Some(selection.selected),
            self.state.config().week_start,
        )
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.browse_offset = 0;
    }
}

fn months_between(from: YearMonth, to: YearMonth) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Weekday};
    use chrono_tz::America::Chicago;
    use epocha_core::{EpochError, EpochSeconds};
    use epocha_time::{ManualClock, TimeStateConfig};

    const SAMPLE: i64 = 1_675_639_572;

    fn session_at(start: i64) -> (Session<chrono_tz::Tz>, ManualClock) {
        let clock = ManualClock::new(EpochSeconds::from_secs(start).unwrap());
        let state = TimeState::with_zone(Chicago, clock.clone());
        (Session::mount(state), clock)
    }

    #[test]
    fn test_mount_focuses_epoch_with_selection() {
        let (session, _) = session_at(SAMPLE);

        let focus = session.focus();
        assert_eq!(focus.target, Representation::Epoch);
        assert!(focus.select_all);
        assert_eq!(session.revision(), 0);
        assert!(!session.is_hidden());
    }

    #[test]
    fn test_snapshot_after_epoch_edit() {
        let (mut session, _) = session_at(0);

        session.dispatch(Edit::Epoch("1675639572".into())).unwrap();
        let snap = session.snapshot();

        assert_eq!(snap.revision, 1);
        assert_eq!(snap.epoch, "1675639572");
        assert_eq!(snap.locale, "February 5, 2023 5:26:12 PM CST");
        assert_eq!(snap.utc, "February 5, 2023 11:26:12 PM UTC");
        assert_eq!(snap.date_field, "2023-02-05");
        assert_eq!(snap.time_field, "17:26:12");
        assert_eq!(snap.text(Representation::Calendar), "2023-02-05");
    }

    #[test]
    fn test_time_edit_through_session() {
        let (mut session, _) = session_at(SAMPLE);

        session.dispatch(Edit::TimeField("18:35:10".into())).unwrap();

        assert_eq!(session.snapshot().epoch, "1675643710");
        assert_eq!(session.snapshot().date_field, "2023-02-05");
    }

    #[test]
    fn test_failed_edit_changes_nothing() {
        let (mut session, _) = session_at(SAMPLE);
        let before = session.snapshot();

        let err = session.dispatch(Edit::Epoch("not-a-number".into())).unwrap_err();
        assert!(matches!(err, EpochError::InvalidNumericInput { .. }));
        assert!(session.dispatch(Edit::EpochValue(f64::NAN)).is_err());
        assert!(session.dispatch(Edit::DateField("2023-02-30".into())).is_err());
        assert!(session.dispatch(Edit::TimeField("25:00:00".into())).is_err());

        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_calendar_pick_through_session() {
        let (mut session, _) = session_at(SAMPLE);
        let day = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();

        session.dispatch(Edit::CalendarPick(day)).unwrap();
        let snap = session.snapshot();

        assert_eq!(snap.calendar.selected, day);
        assert_eq!(snap.date_field, "2024-07-04");
        assert_eq!(snap.time_field, "17:26:12");
    }

    #[test]
    fn test_return_from_hidden_refreshes_and_refocuses() {
        let (mut session, clock) = session_at(SAMPLE);
        session.dispatch(Edit::Epoch("0".into())).unwrap();
        session.focus_on(Representation::TimeField);

        assert_eq!(session.visibility_changed(Visibility::Hidden), None);
        assert!(session.is_hidden());
        assert_eq!(session.snapshot().epoch, "0");

        clock.advance(90);
        let request = session.visibility_changed(Visibility::Visible).unwrap();

        assert_eq!(request, FocusRequest::on(Representation::Epoch));
        assert!(request.select_all);
        assert_eq!(session.focus(), request);
        assert_eq!(session.state().epoch_seconds(), SAMPLE + 90);
        assert_eq!(session.revision(), 2);
    }

    #[test]
    fn test_repeated_visible_signal_is_ignored() {
        let (mut session, clock) = session_at(SAMPLE);
        clock.advance(60);

        assert_eq!(session.visibility_changed(Visibility::Visible), None);
        assert_eq!(session.state().epoch_seconds(), SAMPLE);
        assert_eq!(session.revision(), 0);
    }

    #[test]
    fn test_calendar_browsing_snaps_back_on_edit() {
        let (mut session, _) = session_at(SAMPLE);
        let feb = YearMonth::new(2023, 2).unwrap();
        assert_eq!(session.visible_month(), feb);

        assert_eq!(session.browse_month(1), YearMonth::new(2023, 3).unwrap());
        assert_eq!(session.browse_month(-14), YearMonth::new(2022, 1).unwrap());
        assert_eq!(session.calendar_grid().month(), YearMonth::new(2022, 1).unwrap());
        // the instant did not move
        assert_eq!(session.state().epoch_seconds(), SAMPLE);

        session.dispatch(Edit::TimeField("08:00:00".into())).unwrap();
        assert_eq!(session.visible_month(), feb);
    }

    #[test]
    fn test_calendar_grid_marks_selected_day() {
        let (session, _) = session_at(SAMPLE);
        let grid = session.calendar_grid();
        let day = NaiveDate::from_ymd_opt(2023, 2, 5).unwrap();

        let (row, col) = grid.position_of(day).unwrap();
        assert!(grid.weeks()[row][col].selected);
        assert_eq!(grid.week_start(), Weekday::Sun);
    }

    #[test]
    fn test_calendar_grid_follows_configured_week_start() {
        let clock = ManualClock::new(EpochSeconds::from_secs(SAMPLE).unwrap());
        let state = TimeState::with_config(Chicago, clock, TimeStateConfig::iso());
        let grid = Session::mount(state).calendar_grid();

        assert_eq!(grid.week_start(), Weekday::Mon);
        assert!(grid.weeks().iter().all(|week| week[0].date.weekday() == Weekday::Mon));
    }
}
