use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::dates::{CalendarDate, DateRange};
use crate::models::{CardSummary, DayCard, DayCardUpdate, DayStampWithAsset, Praise, StampAsset};

/// Errors from journal store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Logical tables behind the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Praises,
    DayCards,
    DayStamps,
    StampAssets,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Praises => "praises",
            Table::DayCards => "day_cards",
            Table::DayStamps => "day_stamps",
            Table::StampAssets => "stamp_assets",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row access for journal data. Every per-user operation is scoped by `user_id`;
/// rows belonging to other users behave as if they do not exist.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// One date per praise row in range, duplicates kept. `None` covers all time.
    async fn list_entry_dates(
        &self,
        user_id: Uuid,
        range: Option<DateRange>,
    ) -> StoreResult<Vec<CalendarDate>>;

    async fn list_card_summaries(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<CardSummary>>;

    async fn list_stamp_dates(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<CalendarDate>>;

    /// Praises for one day, newest first
    async fn list_praises(&self, user_id: Uuid, date: CalendarDate) -> StoreResult<Vec<Praise>>;

    async fn insert_praise(
        &self,
        user_id: Uuid,
        date: CalendarDate,
        content: &str,
    ) -> StoreResult<Praise>;

    async fn update_praise(&self, user_id: Uuid, id: i64, content: &str) -> StoreResult<Praise>;

    async fn delete_praise(&self, user_id: Uuid, id: i64) -> StoreResult<()>;

    async fn get_day_card(&self, user_id: Uuid, date: CalendarDate) -> StoreResult<Option<DayCard>>;

    /// Insert or merge the card for `(user_id, date)`
    async fn upsert_day_card(
        &self,
        user_id: Uuid,
        date: CalendarDate,
        update: &DayCardUpdate,
    ) -> StoreResult<DayCard>;

    async fn list_stamp_assets(&self) -> StoreResult<Vec<StampAsset>>;

    async fn get_day_stamp(
        &self,
        user_id: Uuid,
        date: CalendarDate,
    ) -> StoreResult<Option<DayStampWithAsset>>;

    /// Insert or replace the stamp for `(user_id, date)`
    async fn set_day_stamp(
        &self,
        user_id: Uuid,
        date: CalendarDate,
        stamp_asset_id: i64,
    ) -> StoreResult<DayStampWithAsset>;

    /// Returns whether a stamp was removed
    async fn remove_day_stamp(&self, user_id: Uuid, date: CalendarDate) -> StoreResult<bool>;

    async fn health_check(&self) -> StoreResult<()>;
}
