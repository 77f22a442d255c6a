//! Calendar month model for day pickers

use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Paging never leaves this year range
const YEAR_LIMIT: i32 = 250_000;

/// A calendar month (proleptic Gregorian)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Month is 1-12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| YearMonth { year, month })
    }

    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        // constructed from a valid date, so day 1 exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(self) -> u32 {
        match self.month {
            2 if is_leap_year(self.year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Move by a signed number of months, clamped to ±250,000 years
    pub fn offset(self, months: i32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + months as i64;
        let lo = -(YEAR_LIMIT as i64) * 12;
        let hi = YEAR_LIMIT as i64 * 12 + 11;
        let index = index.clamp(lo.min(self.index()), hi.max(self.index()));
        YearMonth {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn next(self) -> Self {
        self.offset(1)
    }

    pub fn prev(self) -> Self {
        self.offset(-1)
    }

    fn index(self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }
}

impl fmt::Debug for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "YearMonth({}-{:02})", self.year, self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn is_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

/// What a calendar picker shows for the current instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarSelection {
    /// Highlighted day
    pub selected: NaiveDate,
    /// Month the picker is positioned on
    pub visible_month: YearMonth,
}

impl CalendarSelection {
    pub fn of(date: NaiveDate) -> Self {
        CalendarSelection {
            selected: date,
            visible_month: YearMonth::of(date),
        }
    }
}

/// One cell of a month grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months
    pub in_month: bool,
    pub selected: bool,
}

/// Weeks of a month as a picker lays them out
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    month: YearMonth,
    week_start: Weekday,
    weeks: Vec<[GridDay; 7]>,
}

impl MonthGrid {
    /// Build the grid for `month`, flagging `selected` wherever it appears
    pub fn build(month: YearMonth, selected: Option<NaiveDate>, week_start: Weekday) -> Self {
        let first = month.first_day();
        let lead = (first.weekday().num_days_from_sunday() + 7
            - week_start.num_days_from_sunday())
            % 7;
        let start = first
            .checked_sub_days(Days::new(lead as u64))
            .unwrap_or(first);
        let cells = (lead + month.days_in_month()).div_ceil(7) * 7;

        let days: Vec<GridDay> = (0..cells as u64)
            .map(|i| {
                let date = start.checked_add_days(Days::new(i)).unwrap_or(start);
                GridDay {
                    date,
                    in_month: month.contains(date),
                    selected: Some(date) == selected,
                }
            })
            .collect();

        let weeks = days
            .chunks_exact(7)
            .filter_map(|week| <[GridDay; 7]>::try_from(week).ok())
            .collect();

        MonthGrid {
            month,
            week_start,
            weeks,
        }
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn weeks(&self) -> &[[GridDay; 7]] {
        &self.weeks
    }

    /// Two-letter column headers in grid order
    pub fn weekday_labels(&self) -> [&'static str; 7] {
        const LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
        let offset = self.week_start.num_days_from_sunday() as usize;
        std::array::from_fn(|i| LABELS[(offset + i) % 7])
    }

    /// (week, column) of a date, if the grid shows it
    pub fn position_of(&self, date: NaiveDate) -> Option<(usize, usize)> {
        self.weeks.iter().enumerate().find_map(|(row, week)| {
            week.iter()
                .position(|day| day.date == date)
                .map(|col| (row, col))
        })
    }
}
