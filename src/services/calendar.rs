//! Month calendar grid
//!
//! Builds a Sunday-first grid of weeks for one month. All date math happens on
//! local calendar dates (`NaiveDate`); timestamps are converted with a caller
//! supplied time zone before they get here.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::models::date::{date_key, days_in_month, local_date};
use crate::models::Transaction;

/// A year and zero-based month, always normalized to `0..12`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    year: i32,
    month0: u32,
}

impl MonthCursor {
    /// Build a cursor, rolling months outside `0..12` into adjacent years
    /// (`new(2024, 12)` is January 2025, `new(2024, -1)` is December 2023).
    pub fn new(year: i32, month0: i32) -> Self {
        Self {
            year: year + month0.div_euclid(12),
            month0: month0.rem_euclid(12) as u32,
        }
    }

    /// The month a date falls in
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// One-based month number
    pub fn month(&self) -> u32 {
        self.month0 + 1
    }

    pub fn previous(&self) -> Self {
        Self::new(self.year, self.month0 as i32 - 1)
    }

    pub fn next(&self) -> Self {
        Self::new(self.year, self.month0 as i32 + 1)
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month())
    }

    /// The first day of the month, `None` only for years chrono cannot represent
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month(), 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    /// Human label, e.g. `October 2026`
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(first) => first.format("%B %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}

impl FromStr for MonthCursor {
    type Err = String;

    /// Parse `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid month '{}', expected YYYY-MM", s);

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self::new(year, month as i32 - 1))
    }
}

/// A day in the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// Day of month, 1-based
    pub day: u32,
    pub date: NaiveDate,
    /// `YYYY-MM-DD`
    pub key: String,
    pub marked: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cell {
    /// Padding before the 1st or after the last day
    #[default]
    Empty,
    Day(DayCell),
}

impl Cell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            Cell::Day(day) => Some(day),
            Cell::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Sunday through Saturday
pub type Week = [Cell; 7];

/// Lay out `month` as whole weeks.
///
/// The first week starts with one blank per weekday before the 1st (Sunday is
/// 0), every day of the month appears exactly once, and the last week is
/// padded with blanks to seven cells.
pub fn build_month_grid(
    month: MonthCursor,
    marked: &HashSet<NaiveDate>,
    selected: Option<NaiveDate>,
) -> Vec<Week> {
    let Some(first) = month.first_day() else {
        return Vec::new();
    };

    let leading = first.weekday().num_days_from_sunday() as usize;
    let days = month.days() as usize;

    let mut cells: Vec<Cell> = Vec::with_capacity(leading + days + 6);
    cells.extend((0..leading).map(|_| Cell::Empty));
    cells.extend(first.iter_days().take(days).map(|date| {
        Cell::Day(DayCell {
            day: date.day(),
            date,
            key: date_key(date),
            marked: marked.contains(&date),
            selected: selected == Some(date),
        })
    }));

    let week_count = cells.len().div_ceil(7);
    let mut cells = cells.into_iter();

    (0..week_count)
        .map(|_| std::array::from_fn(|_| cells.next().unwrap_or_default()))
        .collect()
}

/// Local dates of `timestamps` that fall inside `month`
pub fn marked_dates_for_month<Tz, I>(timestamps: I, month: MonthCursor, tz: &Tz) -> HashSet<NaiveDate>
where
    Tz: TimeZone,
    I: IntoIterator<Item = DateTime<Utc>>,
{
    timestamps
        .into_iter()
        .map(|ts| local_date(ts, tz))
        .filter(|date| month.contains(*date))
        .collect()
}

/// Due dates of every transaction that is not paid yet
pub fn unpaid_due_dates(transactions: &[Transaction]) -> Vec<DateTime<Utc>> {
    transactions
        .iter()
        .filter(|t| !t.status.is_paid())
        .filter_map(|t| t.due_date)
        .collect()
}
