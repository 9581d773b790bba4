//! Page planning for PDF exports over a date range.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::aggregation::{self, ActivityMap, AggregationError};
use crate::dates::{self, CalendarDate, DateError, DateRange};
use crate::database::JournalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    Day,
    Week,
    Month,
}

impl ExportMode {
    fn file_label(&self) -> &'static str {
        match self {
            ExportMode::Day => "Days",
            ExportMode::Week => "Weeks",
            ExportMode::Month => "Months",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportMode::Day => "day",
            ExportMode::Week => "week",
            ExportMode::Month => "month",
        })
    }
}

impl FromStr for ExportMode {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(ExportMode::Day),
            "week" => Ok(ExportMode::Week),
            "month" => Ok(ExportMode::Month),
            other => Err(ExportError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Please select a valid date range")]
    InvalidRange,

    #[error("No content to export for the selected date range")]
    NoContent,

    #[error("Unknown export mode '{0}', expected day, week or month")]
    UnknownMode(String),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// One rendered page: a day, a week or a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPage {
    pub label: String,
    pub range: DateRange,
    /// Days inside both this page and the requested range that have activity
    pub active_days: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPlan {
    pub mode: ExportMode,
    pub range: DateRange,
    pub filename: String,
    pub pages: Vec<ExportPage>,
}

/// `DayPat_{Days|Weeks|Months}_{YYYYMMDD}-{YYYYMMDD}.pdf`
pub fn export_filename(mode: ExportMode, range: DateRange) -> String {
    format!(
        "DayPat_{}_{}-{}.pdf",
        mode.file_label(),
        range.start.naive().format("%Y%m%d"),
        range.end.naive().format("%Y%m%d")
    )
}

/// Validate the requested bounds
pub fn export_range(from: CalendarDate, to: CalendarDate) -> Result<DateRange, ExportError> {
    DateRange::new(from, to).ok_or(ExportError::InvalidRange)
}

/// Lay out pages for `range`, keeping only periods with some activity
pub fn plan_export(
    mode: ExportMode,
    range: DateRange,
    activity: &ActivityMap,
) -> Result<ExportPlan, ExportError> {
    let periods = match mode {
        ExportMode::Day => range
            .days()
            .map(|d| (d.key(), DateRange { start: d, end: d }))
            .collect::<Vec<_>>(),
        ExportMode::Week => week_periods(range)?,
        ExportMode::Month => month_periods(range)?,
    };

    let pages: Vec<ExportPage> = periods
        .into_iter()
        .map(|(label, period)| {
            let active_days = period
                .days()
                .filter(|d| range.contains(*d))
                .filter(|d| activity.get(d).is_some_and(|r| r.has_activity()))
                .count();
            ExportPage {
                label,
                range: period,
                active_days,
            }
        })
        .filter(|page| page.active_days > 0)
        .collect();

    if pages.is_empty() {
        return Err(ExportError::NoContent);
    }

    Ok(ExportPlan {
        mode,
        range,
        filename: export_filename(mode, range),
        pages,
    })
}

/// Load activity for the range and plan pages from it
pub async fn load_export_plan(
    store: &dyn JournalStore,
    user_id: Uuid,
    mode: ExportMode,
    from: CalendarDate,
    to: CalendarDate,
) -> Result<ExportPlan, ExportError> {
    let range = export_range(from, to)?;
    let activity = aggregation::load_range(store, user_id, range).await?;
    plan_export(mode, range, &activity)
}

fn week_periods(range: DateRange) -> Result<Vec<(String, DateRange)>, ExportError> {
    let mut periods = Vec::new();
    let mut week = dates::week_range(range.start.naive())?;
    while week.start <= range.end {
        periods.push((format!("Week of {}", week.start), week));
        week = dates::week_range(week.end.succ().naive())?;
    }
    Ok(periods)
}

fn month_periods(range: DateRange) -> Result<Vec<(String, DateRange)>, ExportError> {
    let mut periods = Vec::new();
    let start = range.start.naive();
    let (mut year, mut month) = (start.year(), start.month());
    loop {
        let period = dates::month_range(year, month)?;
        if period.start > range.end {
            break;
        }
        periods.push((format!("{:04}-{:02}", year, month), period));
        (year, month) = next_month(year, month);
    }
    Ok(periods)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::fold_activity;
    use crate::database::MemoryStore;
    use chrono::Weekday;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn range(from: &str, to: &str) -> DateRange {
        export_range(date(from), date(to)).unwrap()
    }

    #[test]
    fn filenames_follow_mode() {
        let r = range("2024-01-05", "2024-02-10");
        assert_eq!(export_filename(ExportMode::Day, r), "DayPat_Days_20240105-20240210.pdf");
        assert_eq!(export_filename(ExportMode::Week, r), "DayPat_Weeks_20240105-20240210.pdf");
        assert_eq!(export_filename(ExportMode::Month, r), "DayPat_Months_20240105-20240210.pdf");
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = export_range(date("2024-02-10"), date("2024-01-05")).unwrap_err();
        assert_eq!(err.to_string(), "Please select a valid date range");
    }

    #[test]
    fn day_mode_has_one_page_per_active_day() {
        let activity = fold_activity(
            vec![date("2024-01-06"), date("2024-01-06")],
            vec![],
            vec![date("2024-01-09")],
        );
        let plan =
            plan_export(ExportMode::Day, range("2024-01-05", "2024-01-10"), &activity).unwrap();
        let labels: Vec<&str> = plan.pages.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["2024-01-06", "2024-01-09"]);
    }

    #[test]
    fn week_mode_uses_monday_weeks() {
        // 2024-01-05 is a Friday; the first page starts Monday 2024-01-01
        let activity = fold_activity(vec![date("2024-01-05"), date("2024-01-15")], vec![], vec![]);
        let plan =
            plan_export(ExportMode::Week, range("2024-01-05", "2024-01-20"), &activity).unwrap();
        assert_eq!(plan.pages.len(), 2);
        assert_eq!(plan.pages[0].range.start, date("2024-01-01"));
        assert_eq!(plan.pages[1].range.start, date("2024-01-15"));
        assert!(plan
            .pages
            .iter()
            .all(|p| p.range.start.naive().weekday() == Weekday::Mon));
    }

    #[test]
    fn month_mode_crosses_year_boundaries() {
        let activity = fold_activity(vec![date("2023-12-31"), date("2024-01-01")], vec![], vec![]);
        let plan =
            plan_export(ExportMode::Month, range("2023-12-15", "2024-01-15"), &activity).unwrap();
        let labels: Vec<&str> = plan.pages.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["2023-12", "2024-01"]);
    }

    #[test]
    fn activity_outside_the_range_does_not_count() {
        let activity = fold_activity(vec![date("2024-01-01")], vec![], vec![]);
        let err = plan_export(ExportMode::Week, range("2024-01-03", "2024-01-05"), &activity)
            .unwrap_err();
        assert!(matches!(err, ExportError::NoContent));
    }

    #[test]
    fn empty_range_has_no_content() {
        let empty = ActivityMap::new();
        let err = plan_export(ExportMode::Day, range("2024-01-01", "2024-01-31"), &empty)
            .unwrap_err();
        assert_eq!(err.to_string(), "No content to export for the selected date range");
    }

    #[test]
    fn modes_parse_from_query_strings() {
        assert_eq!("week".parse::<ExportMode>().unwrap(), ExportMode::Week);
        assert!(matches!("favorites".parse::<ExportMode>(), Err(ExportError::UnknownMode(_))));
    }

    #[tokio::test]
    async fn plan_loads_from_the_store() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.insert_praise(user, date("2024-03-02"), "x").await.unwrap();

        let (from, to) = (date("2024-03-01"), date("2024-04-30"));
        let plan = load_export_plan(&store, user, ExportMode::Month, from, to)
            .await
            .unwrap();
        assert_eq!(plan.pages.len(), 1);
        assert_eq!(plan.pages[0].active_days, 1);
        assert_eq!(plan.filename, "DayPat_Months_20240301-20240430.pdf");
    }
}
