use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dates::{CalendarDate, DateRange};
use crate::database::store::{JournalStore, StoreError, StoreResult, Table};
use crate::models::{
    CardSummary, DayCard, DayCardUpdate, DayStamp, DayStampWithAsset, Praise, StampAsset,
};

/// Stamp catalogue every fresh store starts with, matching the migration seed
const SEED_STAMPS: [(&str, &str); 4] = [
    ("excellent", "참 잘했어요"),
    ("great", "Great job"),
    ("proud", "So proud"),
    ("star", "Gold star"),
];

#[derive(Default)]
struct Tables {
    praises: Vec<Praise>,
    day_cards: Vec<DayCard>,
    day_stamps: Vec<DayStamp>,
    stamp_assets: Vec<StampAsset>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn stamp_with_asset(&self, stamp: &DayStamp) -> StoreResult<DayStampWithAsset> {
        let asset = self
            .stamp_assets
            .iter()
            .find(|a| a.id == stamp.stamp_asset_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("stamp asset {}", stamp.stamp_asset_id)))?;
        Ok(DayStampWithAsset {
            stamp: stamp.clone(),
            stamp_asset: asset,
        })
    }
}

/// In-process journal store used for development and tests.
///
/// Tables can be made to fail on demand with [`MemoryStore::fail_table`].
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failing: RwLock<HashSet<Table>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut tables = Tables::default();
        let now = Utc::now();
        for (key, label) in SEED_STAMPS {
            let id = tables.next_id();
            tables.stamp_assets.push(StampAsset {
                id,
                key: key.to_string(),
                label: label.to_string(),
                asset_url: None,
                created_at: now,
            });
        }
        Self {
            tables: RwLock::new(tables),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Make every access to `table` fail until cleared
    pub async fn fail_table(&self, table: Table) {
        self.failing.write().await.insert(table);
    }

    pub async fn clear_failures(&self) {
        self.failing.write().await.clear();
    }

    async fn check(&self, table: Table) -> StoreResult<()> {
        if self.failing.read().await.contains(&table) {
            return Err(StoreError::Unavailable(format!("{} is unavailable", table)));
        }
        Ok(())
    }
}

fn in_range(range: &Option<DateRange>, date: CalendarDate) -> bool {
    range.as_ref().map_or(true, |r| r.contains(date))
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn list_entry_dates(
        &self,
        user_id: Uuid,
        range: Option<DateRange>,
    ) -> StoreResult<Vec<CalendarDate>> {
        self.check(Table::Praises).await?;
        let tables = self.tables.read().await;
        Ok(tables
            .praises
            .iter()
            .filter(|p| p.user_id == user_id && in_range(&range, p.praise_date))
            .map(|p| p.praise_date)
            .collect())
    }

    async fn list_card_summaries(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<CardSummary>> {
        self.check(Table::DayCards).await?;
        let tables = self.tables.read().await;
        Ok(tables
            .day_cards
            .iter()
            .filter(|c| c.user_id == user_id && range.contains(c.card_date))
            .map(|c| CardSummary {
                card_date: c.card_date,
                photo_url: c.photo_url.clone(),
                thumb_url: c.thumb_url.clone(),
            })
            .collect())
    }

    async fn list_stamp_dates(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<CalendarDate>> {
        self.check(Table::DayStamps).await?;
        let tables = self.tables.read().await;
        Ok(tables
            .day_stamps
            .iter()
            .filter(|s| s.user_id == user_id && range.contains(s.praise_date))
            .map(|s| s.praise_date)
            .collect())
    }

    async fn list_praises(&self, user_id: Uuid, date: CalendarDate) -> StoreResult<Vec<Praise>> {
        self.check(Table::Praises).await?;
        let tables = self.tables.read().await;
        let mut praises: Vec<Praise> = tables
            .praises
            .iter()
            .filter(|p| p.user_id == user_id && p.praise_date == date)
            .cloned()
            .collect();
        praises.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(praises)
    }

    async fn insert_praise(
        &self,
        user_id: Uuid,
        date: CalendarDate,
        content: &str,
    ) -> StoreResult<Praise> {
        self.check(Table::Praises).await?;
        let mut tables = self.tables.write().await;
        let praise = Praise {
            id: tables.next_id(),
            user_id,
            praise_date: date,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        tables.praises.push(praise.clone());
        Ok(praise)
    }

    async fn update_praise(&self, user_id: Uuid, id: i64, content: &str) -> StoreResult<Praise> {
        self.check(Table::Praises).await?;
        let mut tables = self.tables.write().await;
        let praise = tables
            .praises
            .iter_mut()
            .find(|p| p.user_id == user_id && p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("praise {}", id)))?;
        praise.content = content.to_string();
        Ok(praise.clone())
    }

    async fn delete_praise(&self, user_id: Uuid, id: i64) -> StoreResult<()> {
        self.check(Table::Praises).await?;
        let mut tables = self.tables.write().await;
        let before = tables.praises.len();
        tables.praises.retain(|p| !(p.user_id == user_id && p.id == id));
        if tables.praises.len() == before {
            return Err(StoreError::NotFound(format!("praise {}", id)));
        }
        Ok(())
    }

    async fn get_day_card(
        &self,
        user_id: Uuid,
        date: CalendarDate,
    ) -> StoreResult<Option<DayCard>> {
        self.check(Table::DayCards).await?;
        let tables = self.tables.read().await;
        Ok(tables
            .day_cards
            .iter()
            .find(|c| c.user_id == user_id && c.card_date == date)
            .cloned())
    }

    async fn upsert_day_card(
        &self,
        user_id: Uuid,
        date: CalendarDate,
        update: &DayCardUpdate,
    ) -> StoreResult<DayCard> {
        self.check(Table::DayCards).await?;
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        if let Some(card) = tables
            .day_cards
            .iter_mut()
            .find(|c| c.user_id == user_id && c.card_date == date)
        {
            let merged = update.merge_onto(Some(card));
            card.photo_url = merged.photo_url;
            card.thumb_url = merged.thumb_url;
            card.caption = merged.caption;
            card.sticker_state = merged.sticker_state;
            card.updated_at = now;
            return Ok(card.clone());
        }

        let merged = update.merge_onto(None);
        let card = DayCard {
            id: tables.next_id(),
            user_id,
            card_date: date,
            photo_url: merged.photo_url,
            thumb_url: merged.thumb_url,
            caption: merged.caption,
            sticker_state: merged.sticker_state,
            updated_at: now,
        };
        tables.day_cards.push(card.clone());
        Ok(card)
    }

    async fn list_stamp_assets(&self) -> StoreResult<Vec<StampAsset>> {
        self.check(Table::StampAssets).await?;
        Ok(self.tables.read().await.stamp_assets.clone())
    }

    async fn get_day_stamp(
        &self,
        user_id: Uuid,
        date: CalendarDate,
    ) -> StoreResult<Option<DayStampWithAsset>> {
        self.check(Table::DayStamps).await?;
        let tables = self.tables.read().await;
        tables
            .day_stamps
            .iter()
            .find(|s| s.user_id == user_id && s.praise_date == date)
            .map(|s| tables.stamp_with_asset(s))
            .transpose()
    }

    async fn set_day_stamp(
        &self,
        user_id: Uuid,
        date: CalendarDate,
        stamp_asset_id: i64,
    ) -> StoreResult<DayStampWithAsset> {
        self.check(Table::DayStamps).await?;
        let mut tables = self.tables.write().await;
        if !tables.stamp_assets.iter().any(|a| a.id == stamp_asset_id) {
            return Err(StoreError::NotFound(format!("stamp asset {}", stamp_asset_id)));
        }
        let now = Utc::now();

        let stamp = match tables
            .day_stamps
            .iter_mut()
            .find(|s| s.user_id == user_id && s.praise_date == date)
        {
            Some(existing) => {
                existing.stamp_asset_id = stamp_asset_id;
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let stamp = DayStamp {
                    id: tables.next_id(),
                    user_id,
                    praise_date: date,
                    stamp_asset_id,
                    updated_at: now,
                };
                tables.day_stamps.push(stamp.clone());
                stamp
            }
        };
        tables.stamp_with_asset(&stamp)
    }

    async fn remove_day_stamp(&self, user_id: Uuid, date: CalendarDate) -> StoreResult<bool> {
        self.check(Table::DayStamps).await?;
        let mut tables = self.tables.write().await;
        let before = tables.day_stamps.len();
        tables
            .day_stamps
            .retain(|s| !(s.user_id == user_id && s.praise_date == date));
        Ok(tables.day_stamps.len() != before)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
