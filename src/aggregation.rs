//! Folds praise, card and stamp rows for a date range into one activity map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::dates::{self, CalendarDate, DateError, DateRange};
use crate::database::{JournalStore, StoreError, Table};
use crate::models::CardSummary;

/// Per-day rollup shown on calendar cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub date: CalendarDate,
    pub has_entry: bool,
    pub entry_count: u32,
    pub thumbnail_ref: Option<String>,
    pub has_stamp: bool,
}

impl ActivityRecord {
    pub fn empty(date: CalendarDate) -> Self {
        Self {
            date,
            has_entry: false,
            entry_count: 0,
            thumbnail_ref: None,
            has_stamp: false,
        }
    }

    pub fn has_activity(&self) -> bool {
        self.has_entry || self.thumbnail_ref.is_some() || self.has_stamp
    }
}

pub type ActivityMap = HashMap<CalendarDate, ActivityRecord>;

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Failed to load {table}: {source}")]
    Fetch {
        table: Table,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Date(#[from] DateError),
}

impl AggregationError {
    fn fetch(table: Table) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Fetch { table, source }
    }
}

/// Combine the three row sets. The key set is the union of all inputs.
pub fn fold_activity(
    entry_dates: Vec<CalendarDate>,
    cards: Vec<CardSummary>,
    stamp_dates: Vec<CalendarDate>,
) -> ActivityMap {
    let mut map = ActivityMap::new();

    for date in entry_dates {
        let record = map.entry(date).or_insert_with(|| ActivityRecord::empty(date));
        record.entry_count += 1;
        record.has_entry = true;
    }

    for card in cards {
        let thumbnail = card.thumbnail_ref();
        let record = map
            .entry(card.card_date)
            .or_insert_with(|| ActivityRecord::empty(card.card_date));
        record.thumbnail_ref = thumbnail;
    }

    for date in stamp_dates {
        map.entry(date)
            .or_insert_with(|| ActivityRecord::empty(date))
            .has_stamp = true;
    }

    map
}

/// Fetch the three sources concurrently and fold them. Any failing fetch fails the whole load.
pub async fn load_range(
    store: &dyn JournalStore,
    user_id: Uuid,
    range: DateRange,
) -> Result<ActivityMap, AggregationError> {
    let result = futures::try_join!(
        async {
            store
                .list_entry_dates(user_id, Some(range))
                .await
                .map_err(AggregationError::fetch(Table::Praises))
        },
        async {
            store
                .list_card_summaries(user_id, range)
                .await
                .map_err(AggregationError::fetch(Table::DayCards))
        },
        async {
            store
                .list_stamp_dates(user_id, range)
                .await
                .map_err(AggregationError::fetch(Table::DayStamps))
        },
    );

    match result {
        Ok((entries, cards, stamps)) => {
            let map = fold_activity(entries, cards, stamps);
            info!(
                "Loaded activity {}..{} ({} active days)",
                range.start,
                range.end,
                map.len()
            );
            Ok(map)
        }
        Err(e) => {
            error!("Activity load {}..{} failed: {}", range.start, range.end, e);
            Err(e)
        }
    }
}

/// One cell of the month grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub date: CalendarDate,
    pub in_month: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthActivity {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<GridCell>,
    pub activity: ActivityMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekActivity {
    pub range: DateRange,
    pub days: Vec<CalendarDate>,
    pub activity: ActivityMap,
}

/// Activity for the visible month grid, including adjacent-month filler days
pub async fn load_month(
    store: &dyn JournalStore,
    user_id: Uuid,
    year: i32,
    month: u32,
) -> Result<MonthActivity, AggregationError> {
    let grid = dates::calendar_days(year, month)?;
    let (first, last) = match (grid.first(), grid.last()) {
        (Some(first), Some(last)) => (CalendarDate::from(*first), CalendarDate::from(*last)),
        _ => return Err(DateError::OutOfRange.into()),
    };
    let range = DateRange::new(first, last).ok_or(DateError::OutOfRange)?;

    let activity = load_range(store, user_id, range).await?;
    let cells = grid
        .into_iter()
        .map(|d| GridCell {
            date: d.into(),
            in_month: chrono::Datelike::month(&d) == month,
        })
        .collect();

    Ok(MonthActivity {
        year,
        month,
        cells,
        activity,
    })
}

pub async fn load_week(
    store: &dyn JournalStore,
    user_id: Uuid,
    anchor: CalendarDate,
) -> Result<WeekActivity, AggregationError> {
    let range = dates::week_range(anchor.naive())?;
    let activity = load_range(store, user_id, range).await?;
    Ok(WeekActivity {
        range,
        days: range.days().collect(),
        activity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::DayCardUpdate;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn fold_unions_all_sources() {
        let cards = vec![CardSummary {
            card_date: date("2024-02-02"),
            photo_url: Some("photo.jpg".into()),
            thumb_url: None,
        }];
        let map = fold_activity(vec![date("2024-02-01")], cards, vec![date("2024-02-03")]);

        assert_eq!(map.len(), 3);

        let entry = &map[&date("2024-02-01")];
        assert!(entry.has_entry);
        assert_eq!(entry.entry_count, 1);
        assert_eq!(entry.thumbnail_ref, None);
        assert!(!entry.has_stamp);

        let card = &map[&date("2024-02-02")];
        assert!(!card.has_entry);
        assert_eq!(card.entry_count, 0);
        assert_eq!(card.thumbnail_ref.as_deref(), Some("photo.jpg"));

        let stamp = &map[&date("2024-02-03")];
        assert!(stamp.has_stamp);
        assert!(!stamp.has_entry);
        assert_eq!(stamp.thumbnail_ref, None);
    }

    #[test]
    fn fold_group_counts_entries() {
        let day = date("2024-02-01");
        let map = fold_activity(vec![day, day, day], vec![], vec![day]);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&day].entry_count, 3);
        assert!(map[&day].has_stamp);
    }

    #[test]
    fn fold_of_nothing_is_empty() {
        assert!(fold_activity(vec![], vec![], vec![]).is_empty());
    }

    #[tokio::test]
    async fn load_range_reads_every_source() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.insert_praise(user, date("2024-02-01"), "a").await.unwrap();
        store
            .upsert_day_card(
                user,
                date("2024-02-02"),
                &DayCardUpdate {
                    thumb_url: Some(Some("t.jpg".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let assets = store.list_stamp_assets().await.unwrap();
        store.set_day_stamp(user, date("2024-02-03"), assets[0].id).await.unwrap();

        let range = DateRange::new(date("2024-02-01"), date("2024-02-29")).unwrap();
        let map = load_range(&store, user, range).await.unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map[&date("2024-02-02")].thumbnail_ref.as_deref(), Some("t.jpg"));
    }

    #[tokio::test]
    async fn one_failing_source_fails_the_load() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.insert_praise(user, date("2024-02-01"), "a").await.unwrap();
        store.fail_table(Table::DayStamps).await;

        let range = DateRange::new(date("2024-02-01"), date("2024-02-29")).unwrap();
        let err = load_range(&store, user, range).await.unwrap_err();
        assert!(matches!(
            err,
            AggregationError::Fetch {
                table: Table::DayStamps,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn month_load_covers_the_whole_grid() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        // 2024-03-01 is a Friday, so the grid opens on Monday 2024-02-26
        store.insert_praise(user, date("2024-02-26"), "filler").await.unwrap();

        let month = load_month(&store, user, 2024, 3).await.unwrap();
        assert_eq!(month.cells.len(), dates::CALENDAR_GRID_CELLS);
        assert_eq!(month.cells[0].date, date("2024-02-26"));
        assert!(!month.cells[0].in_month);
        assert!(month.activity.contains_key(&date("2024-02-26")));
    }

    #[tokio::test]
    async fn invalid_month_is_a_date_error() {
        let store = MemoryStore::new();
        let err = load_month(&store, Uuid::new_v4(), 2024, 13).await.unwrap_err();
        assert!(matches!(err, AggregationError::Date(_)));
    }

    #[tokio::test]
    async fn week_load_spans_monday_to_sunday() {
        let store = MemoryStore::new();
        let week = load_week(&store, Uuid::new_v4(), date("2024-03-06")).await.unwrap();
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.range.start, date("2024-03-04"));
        assert_eq!(week.range.end, date("2024-03-10"));
    }
}
