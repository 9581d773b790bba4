//! Calendar date keys and range math.
//!
//! Every date that crosses a module boundary is keyed by its local calendar
//! fields in `YYYY-MM-DD` form. `format_date_string` is the only producer of
//! that key; anything else that builds keys by hand will silently miss map
//! lookups.

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical key format for calendar dates
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Number of cells in a month grid (6 weeks x 7 days)
pub const CALENDAR_GRID_CELLS: usize = 42;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid date key '{0}', expected YYYY-MM-DD")]
    InvalidKey(String),

    #[error("Invalid month {0}, expected 1-12")]
    InvalidMonth(u32),

    #[error("Date out of supported range")]
    OutOfRange,
}

/// A timezone-naive calendar date.
///
/// Equality and ordering follow the `YYYY-MM-DD` key, which for four-digit
/// years is the same as chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::OutOfRange)
    }

    /// The process-local date right now
    pub fn today() -> Self {
        Self(today())
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn key(&self) -> String {
        format_date_string(self.0)
    }

    pub fn succ(&self) -> Self {
        Self(self.0.succ_opt().unwrap_or(self.0))
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date_string(s).map(Self)
    }
}

// Deserialized keys get the same canonical check as parsed ones
impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(de::Error::custom)
    }
}

/// Inclusive range of calendar dates used for store queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`
    pub fn new(start: CalendarDate, end: CalendarDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, in order
    pub fn days(&self) -> impl Iterator<Item = CalendarDate> {
        let end = self.end.naive();
        self.start
            .naive()
            .iter_days()
            .take_while(move |d| *d <= end)
            .map(CalendarDate::from)
    }
}

/// Format a date as its `YYYY-MM-DD` key
pub fn format_date_string(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key back into a date.
///
/// Only canonical keys are accepted, so `format_date_string(parse_date_string(k)?) == k`
/// holds for every key that parses.
pub fn parse_date_string(key: &str) -> Result<NaiveDate, DateError> {
    let invalid = || DateError::InvalidKey(key.to_string());

    if key.len() != 10 {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).map_err(|_| invalid())?;
    if format_date_string(date) != key {
        return Err(invalid());
    }
    Ok(date)
}

/// The process-local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Monday on or before `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, DateError> {
    if !(1..=12).contains(&month) {
        return Err(DateError::InvalidMonth(month));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(DateError::OutOfRange)
}

fn last_of_month(year: i32, month: u32) -> Result<NaiveDate, DateError> {
    let first = first_of_month(year, month)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month
        .and_then(|d| d.pred_opt())
        .filter(|d| *d >= first)
        .ok_or(DateError::OutOfRange)
}

/// Month grid: 42 consecutive days starting from the Monday on or before the 1st.
///
/// `month` is 1-based.
pub fn calendar_days(year: i32, month: u32) -> Result<Vec<NaiveDate>, DateError> {
    let grid_start = start_of_week(first_of_month(year, month)?);
    let days: Vec<NaiveDate> = grid_start.iter_days().take(CALENDAR_GRID_CELLS).collect();
    if days.len() != CALENDAR_GRID_CELLS {
        return Err(DateError::OutOfRange);
    }
    Ok(days)
}

/// Monday through Sunday of the week containing `anchor`
pub fn week_days(anchor: NaiveDate) -> Vec<NaiveDate> {
    start_of_week(anchor).iter_days().take(7).collect()
}

/// First through last day of the month
pub fn month_range(year: i32, month: u32) -> Result<DateRange, DateError> {
    Ok(DateRange {
        start: first_of_month(year, month)?.into(),
        end: last_of_month(year, month)?.into(),
    })
}

/// Monday through Sunday of the week containing `anchor`
pub fn week_range(anchor: NaiveDate) -> Result<DateRange, DateError> {
    let start = start_of_week(anchor);
    let end = start.checked_add_days(Days::new(6)).ok_or(DateError::OutOfRange)?;
    Ok(DateRange {
        start: start.into(),
        end: end.into(),
    })
}
