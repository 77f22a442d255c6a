//! Edit and signal definitions
//!
//! Every interaction a view reports is an `Edit` tagged with the
//! representation it came from. The host's visibility changes arrive as a
//! separate `Visibility` signal.

use std::fmt;

use chrono::NaiveDate;

/// The six synchronized representations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Raw epoch seconds
    Epoch,
    /// Local display string
    LocaleString,
    /// UTC display string
    UtcString,
    /// Day picker
    Calendar,
    /// `YYYY-MM-DD`
    DateField,
    /// `HH:MM:SS`
    TimeField,
}

impl Representation {
    /// Display order, top to bottom
    pub const ALL: [Representation; 6] = [
        Representation::Epoch,
        Representation::LocaleString,
        Representation::UtcString,
        Representation::Calendar,
        Representation::DateField,
        Representation::TimeField,
    ];

    /// Whether the user can write through this representation
    pub fn is_editable(self) -> bool {
        !matches!(self, Representation::LocaleString | Representation::UtcString)
    }

    /// Whether focusing selects the whole content
    pub fn selects_on_focus(self) -> bool {
        matches!(
            self,
            Representation::Epoch | Representation::LocaleString | Representation::UtcString
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Representation::Epoch => "epoch",
            Representation::LocaleString => "local",
            Representation::UtcString => "utc",
            Representation::Calendar => "calendar",
            Representation::DateField => "date",
            Representation::TimeField => "time",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A user edit, carrying the raw value the view produced
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    /// Text typed into the epoch control
    Epoch(String),
    /// Numeric value from the epoch control
    EpochValue(f64),
    /// Day picked in the calendar
    CalendarPick(NaiveDate),
    /// Date field content
    DateField(String),
    /// Time field content
    TimeField(String),
}

impl Edit {
    /// Representation the edit originated from
    pub fn representation(&self) -> Representation {
        match self {
            Edit::Epoch(_) | Edit::EpochValue(_) => Representation::Epoch,
            Edit::CalendarPick(_) => Representation::Calendar,
            Edit::DateField(_) => Representation::DateField,
            Edit::TimeField(_) => Representation::TimeField,
        }
    }
}

/// Host visibility, reported whenever it changes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Ask the view to move input focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FocusRequest {
    pub target: Representation,
    /// Select the whole content so typing replaces it
    pub select_all: bool,
}

impl FocusRequest {
    pub fn on(target: Representation) -> Self {
        FocusRequest {
            target,
            select_all: target.selects_on_focus(),
        }
    }
}
