//! Consecutive-day streaks over the set of days that have at least one praise.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::dates::{self, format_date_string, CalendarDate};

/// Streak as of today alongside the streak as of the date being viewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current_streak: u32,
    pub selected_streak: u32,
}

/// Count consecutive active days ending at `anchor`, scanning backward.
///
/// Stops at the first day whose key is missing from `active_dates`, so an
/// inactive anchor yields 0. Backfilling a missing day extends the streak on
/// the next computation because it is plain membership testing.
pub fn compute_streak(active_dates: &HashSet<String>, anchor: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut current = anchor;

    while active_dates.contains(&format_date_string(current)) {
        streak += 1;
        match current.pred_opt() {
            Some(prev) => current = prev,
            None => break,
        }
    }

    streak
}

pub fn streak_info(
    active_dates: &HashSet<String>,
    selected_date: NaiveDate,
    today: NaiveDate,
) -> StreakInfo {
    StreakInfo {
        current_streak: compute_streak(active_dates, today),
        selected_streak: compute_streak(active_dates, selected_date),
    }
}

/// `streak_info` anchored at the process-local today
pub fn streak_info_now(active_dates: &HashSet<String>, selected_date: NaiveDate) -> StreakInfo {
    streak_info(active_dates, selected_date, dates::today())
}

/// Unique date keys from raw entry dates as returned by the store
pub fn active_date_keys<I>(dates: I) -> HashSet<String>
where
    I: IntoIterator<Item = CalendarDate>,
{
    dates.into_iter().map(|d| d.key()).collect()
}
