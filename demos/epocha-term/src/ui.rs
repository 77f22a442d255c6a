//! Terminal UI - renders a session and turns terminal events into edits

use std::fmt;
use std::io::{self, Write};

use chrono::{Datelike, NaiveDate, TimeDelta, TimeZone};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use epocha_session::{Edit, FocusRequest, Representation, Session, Visibility};
use epocha_time::YearMonth;
use tracing::debug;

const LABEL_WIDTH: usize = 10;
const HELP: &str = "Tab/Shift-Tab move  Enter commit  Esc revert  arrows/PgUp/PgDn calendar  Ctrl-Q quit";

/// Take over the terminal and run until the user quits
pub fn run<Tz>(session: Session<Tz>, zone_name: &str) -> io::Result<()>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableFocusChange, Hide)?;

    let result = App::new(session, zone_name).event_loop(&mut stdout);

    // restore even when the loop failed
    let restored = execute!(stdout, Show, DisableFocusChange, LeaveAlternateScreen)
        .and_then(|_| terminal::disable_raw_mode());
    result.and(restored)
}

/// Message under the views
#[derive(Clone, Debug, PartialEq, Eq)]
enum Status {
    Idle,
    Info(String),
    Error(String),
}

/// Edit buffer of the focused text control
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct FieldBuffer {
    text: String,
    /// Next keystroke replaces the whole content
    selected: bool,
}

impl FieldBuffer {
    fn load(&mut self, text: String, selected: bool) {
        self.text = text;
        self.selected = selected;
    }

    fn insert(&mut self, c: char) {
        if self.selected {
            self.text.clear();
            self.selected = false;
        }
        self.text.push(c);
    }

    fn backspace(&mut self) {
        if self.selected {
            self.text.clear();
            self.selected = false;
        } else {
            self.text.pop();
        }
    }
}

/// Terminal host for one session
pub struct App<Tz: TimeZone> {
    session: Session<Tz>,
    zone_name: String,
    buffer: FieldBuffer,
    /// Calendar keyboard cursor
    cursor: NaiveDate,
    status: Status,
    quit: bool,
}

impl<Tz> App<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    pub fn new(session: Session<Tz>, zone_name: &str) -> Self {
        let cursor = session.snapshot().calendar.selected;
        let mut app = App {
            session,
            zone_name: zone_name.to_string(),
            buffer: FieldBuffer::default(),
            cursor,
            status: Status::Idle,
            quit: false,
        };
        app.sync();
        app
    }

    fn event_loop(&mut self, out: &mut impl Write) -> io::Result<()> {
        while !self.quit {
            self.draw(out)?;
            self.handle(event::read()?);
        }
        Ok(())
    }

    /// Apply one terminal event
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
            Event::FocusLost => self.on_visibility(Visibility::Hidden),
            Event::FocusGained => self.on_visibility(Visibility::Visible),
            _ => {}
        }
    }

    fn focused(&self) -> Representation {
        self.session.focus().target
    }

    fn on_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => self.quit = true,
            KeyCode::Tab => self.cycle_focus(1),
            KeyCode::BackTab => self.cycle_focus(-1),
            KeyCode::Enter => self.commit(),
            KeyCode::Esc => {
                self.status = Status::Idle;
                self.sync();
            }
            KeyCode::PageUp => self.page(-1),
            KeyCode::PageDown => self.page(1),
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down
                if self.focused() == Representation::Calendar =>
            {
                self.move_cursor(key.code)
            }
            KeyCode::Char(c) if self.has_buffer() => self.buffer.insert(c),
            KeyCode::Backspace if self.has_buffer() => self.buffer.backspace(),
            _ => {}
        }
    }

    fn has_buffer(&self) -> bool {
        let focused = self.focused();
        focused.is_editable() && focused != Representation::Calendar
    }

    fn commit(&mut self) {
        let text = self.buffer.text.clone();
        let edit = match self.focused() {
            Representation::Epoch => Edit::Epoch(text),
            Representation::DateField => Edit::DateField(text),
            Representation::TimeField => Edit::TimeField(text),
            Representation::Calendar => Edit::CalendarPick(self.cursor),
            Representation::LocaleString | Representation::UtcString => return,
        };

        match self.session.dispatch(edit) {
            Ok(()) => {
                self.status = Status::Idle;
                self.sync();
            }
            Err(err) => {
                debug!(error = %err, "edit rejected");
                self.status = Status::Error(err.to_string());
            }
        }
    }

    fn on_visibility(&mut self, visibility: Visibility) {
        if let Some(request) = self.session.visibility_changed(visibility) {
            self.status = Status::Info("resynchronized to now".to_string());
            self.apply_focus(request);
            self.sync();
        }
    }

    fn cycle_focus(&mut self, step: isize) {
        let all = Representation::ALL;
        let current = all.iter().position(|r| *r == self.focused()).unwrap_or(0);
        let next = (current as isize + step).rem_euclid(all.len() as isize) as usize;
        let request = self.session.focus_on(all[next]);
        self.apply_focus(request);
    }

    fn apply_focus(&mut self, request: FocusRequest) {
        let text = self.session.snapshot().text(request.target);
        self.buffer.load(text, request.select_all);
    }

    /// Reload the buffer and calendar cursor from the session
    fn sync(&mut self) {
        let snapshot = self.session.snapshot();
        let focus = self.session.focus();
        self.buffer.load(snapshot.text(focus.target), focus.select_all);
        self.cursor = snapshot.calendar.selected;
    }

    fn page(&mut self, delta: i32) {
        let month = self.session.browse_month(delta);
        let day = self.cursor.day().min(month.days_in_month());
        self.cursor = NaiveDate::from_ymd_opt(month.year(), month.month(), day)
            .unwrap_or_else(|| month.first_day());
    }

    fn move_cursor(&mut self, code: KeyCode) {
        let days = match code {
            KeyCode::Left => -1,
            KeyCode::Right => 1,
            KeyCode::Up => -7,
            KeyCode::Down => 7,
            _ => return,
        };
        let Some(moved) = self.cursor.checked_add_signed(TimeDelta::days(days)) else {
            return;
        };
        let shown = self.session.visible_month();
        let target = YearMonth::of(moved);
        let delta = (target.year() - shown.year()) * 12 + target.month() as i32
            - shown.month() as i32;
        if delta != 0 {
            self.session.browse_month(delta);
        }
        self.cursor = moved;
    }

    /// Render every view
    pub fn draw(&self, out: &mut impl Write) -> io::Result<()> {
        let snapshot = self.session.snapshot();
        let focused = self.focused();
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            Print(format!("Epocha  {}", self.zone_name)),
            SetAttribute(Attribute::Reset)
        )?;

        let mut row: u16 = 2;
        for representation in Representation::ALL {
            let is_focused = representation == focused;
            queue!(out, MoveTo(0, row))?;
            if is_focused {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            queue!(
                out,
                Print(format!("{:<LABEL_WIDTH$}", representation.label())),
                SetAttribute(Attribute::Reset)
            )?;

            if representation == Representation::Calendar {
                row = self.draw_calendar(out, row, is_focused)?;
                continue;
            }

            let (text, selected) = if is_focused {
                (self.buffer.text.clone(), self.buffer.selected)
            } else {
                (snapshot.text(representation), false)
            };
            if selected {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            } else if is_focused {
                queue!(out, SetAttribute(Attribute::Underlined))?;
            }
            queue!(out, Print(text), SetAttribute(Attribute::Reset))?;
            row += 1;
        }

        row += 1;
        match &self.status {
            Status::Idle => {}
            Status::Info(message) => queue!(out, MoveTo(0, row), Print(message))?,
            Status::Error(message) => queue!(
                out,
                MoveTo(0, row),
                SetAttribute(Attribute::Bold),
                Print(format!("rejected: {message}")),
                SetAttribute(Attribute::Reset)
            )?,
        }
        queue!(out, MoveTo(0, row + 1), Print(HELP))?;
        out.flush()
    }

    /// Month header, weekday labels and day grid. Returns the next free row.
    fn draw_calendar(&self, out: &mut impl Write, row: u16, focused: bool) -> io::Result<u16> {
        let grid = self.session.calendar_grid();
        let indent = LABEL_WIDTH as u16;

        queue!(out, Print(grid.month().to_string()))?;
        queue!(out, MoveTo(indent, row + 1), Print(grid.weekday_labels().join(" ")))?;

        let mut row = row + 2;
        for week in grid.weeks() {
            queue!(out, MoveTo(indent, row))?;
            for day in week {
                if !day.in_month {
                    queue!(out, SetAttribute(Attribute::Dim))?;
                }
                if day.selected {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                if focused && day.date == self.cursor {
                    queue!(out, SetAttribute(Attribute::Reverse))?;
                }
                queue!(
                    out,
                    Print(format!("{:>2}", day.date.day())),
                    SetAttribute(Attribute::Reset),
                    Print(" ")
                )?;
            }
            row += 1;
        }
        Ok(row)
    }
}
