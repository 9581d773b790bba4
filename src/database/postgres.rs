use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::dates::{CalendarDate, DateRange};
use crate::database::store::{JournalStore, StoreError, StoreResult};
use crate::models::{
    CardSummary, DayCard, DayCardUpdate, DayStamp, DayStampWithAsset, Praise, StampAsset,
    StickerState,
};

// Postgres error code for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

const PRAISE_COLUMNS: &str = "id, user_id, praise_date, content, created_at";
const CARD_COLUMNS: &str =
    "id, user_id, card_date, photo_url, thumb_url, caption, sticker_state, updated_at";

#[derive(FromRow)]
struct DayCardRow {
    id: i64,
    user_id: Uuid,
    card_date: CalendarDate,
    photo_url: Option<String>,
    thumb_url: Option<String>,
    caption: Option<String>,
    sticker_state: Json<Vec<StickerState>>,
    updated_at: DateTime<Utc>,
}

impl From<DayCardRow> for DayCard {
    fn from(row: DayCardRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            card_date: row.card_date,
            photo_url: row.photo_url,
            thumb_url: row.thumb_url,
            caption: row.caption,
            sticker_state: row.sticker_state.0,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct DayStampRow {
    id: i64,
    user_id: Uuid,
    praise_date: CalendarDate,
    stamp_asset_id: i64,
    updated_at: DateTime<Utc>,
    asset_key: String,
    asset_label: String,
    asset_url: Option<String>,
    asset_created_at: DateTime<Utc>,
}

impl From<DayStampRow> for DayStampWithAsset {
    fn from(row: DayStampRow) -> Self {
        Self {
            stamp: DayStamp {
                id: row.id,
                user_id: row.user_id,
                praise_date: row.praise_date,
                stamp_asset_id: row.stamp_asset_id,
                updated_at: row.updated_at,
            },
            stamp_asset: StampAsset {
                id: row.stamp_asset_id,
                key: row.asset_key,
                label: row.asset_label,
                asset_url: row.asset_url,
                created_at: row.asset_created_at,
            },
        }
    }
}

/// Journal store on PostgreSQL
#[derive(Clone)]
pub struct PgJournalStore {
    pool: PgPool,
}

impl PgJournalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION)
}

#[async_trait]
impl JournalStore for PgJournalStore {
    async fn list_entry_dates(
        &self,
        user_id: Uuid,
        range: Option<DateRange>,
    ) -> StoreResult<Vec<CalendarDate>> {
        let dates = sqlx::query_scalar::<_, CalendarDate>(
            r#"
            SELECT praise_date FROM praises
            WHERE user_id = $1
              AND ($2::date IS NULL OR praise_date >= $2)
              AND ($3::date IS NULL OR praise_date <= $3)
            "#,
        )
        .bind(user_id)
        .bind(range.map(|r| r.start))
        .bind(range.map(|r| r.end))
        .fetch_all(&self.pool)
        .await?;
        Ok(dates)
    }

    async fn list_card_summaries(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<CardSummary>> {
        let cards = sqlx::query_as::<_, CardSummary>(
            "SELECT card_date, photo_url, thumb_url FROM day_cards
             WHERE user_id = $1 AND card_date BETWEEN $2 AND $3",
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        Ok(cards)
    }

    async fn list_stamp_dates(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<CalendarDate>> {
        let dates = sqlx::query_scalar::<_, CalendarDate>(
            "SELECT praise_date FROM day_stamps
             WHERE user_id = $1 AND praise_date BETWEEN $2 AND $3",
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        Ok(dates)
    }

    async fn list_praises(&self, user_id: Uuid, date: CalendarDate) -> StoreResult<Vec<Praise>> {
        let sql = format!(
            "SELECT {PRAISE_COLUMNS} FROM praises
             WHERE user_id = $1 AND praise_date = $2
             ORDER BY created_at DESC, id DESC"
        );
        let praises = sqlx::query_as::<_, Praise>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(praises)
    }

    async fn insert_praise(
        &self,
        user_id: Uuid,
        date: CalendarDate,
        content: &str,
    ) -> StoreResult<Praise> {
        let sql = format!(
            "INSERT INTO praises (user_id, praise_date, content) VALUES ($1, $2, $3)
             RETURNING {PRAISE_COLUMNS}"
        );
        let praise = sqlx::query_as::<_, Praise>(&sql)
            .bind(user_id)
            .bind(date)
            .bind(content)
            .fetch_one(&self.pool)
            .await?;
        Ok(praise)
    }

    async fn update_praise(&self, user_id: Uuid, id: i64, content: &str) -> StoreResult<Praise> {
        let sql = format!(
            "UPDATE praises SET content = $3 WHERE user_id = $1 AND id = $2
             RETURNING {PRAISE_COLUMNS}"
        );
        sqlx::query_as::<_, Praise>(&sql)
            .bind(user_id)
            .bind(id)
            .bind(content)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("praise {}", id)))
    }

    async fn delete_praise(&self, user_id: Uuid, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM praises WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("praise {}", id)));
        }
        Ok(())
    }

    async fn get_day_card(
        &self,
        user_id: Uuid,
        date: CalendarDate,
    ) -> StoreResult<Option<DayCard>> {
        let sql = format!(
            "SELECT {CARD_COLUMNS} FROM day_cards WHERE user_id = $1 AND card_date = $2"
        );
        let row = sqlx::query_as::<_, DayCardRow>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(DayCard::from))
    }

    async fn upsert_day_card(
        &self,
        user_id: Uuid,
        date: CalendarDate,
        update: &DayCardUpdate,
    ) -> StoreResult<DayCard> {
        // Each nullable column carries a "was supplied" flag so that an omitted
        // field keeps its stored value while an explicit null clears it.
        let sql = format!(
            r#"
            INSERT INTO day_cards
                (user_id, card_date, photo_url, thumb_url, caption, sticker_state, updated_at)
            VALUES ($1, $2, $3, $5, $7, COALESCE($9::jsonb, '[]'::jsonb), now())
            ON CONFLICT (user_id, card_date) DO UPDATE SET
                photo_url = CASE WHEN $4 THEN EXCLUDED.photo_url ELSE day_cards.photo_url END,
                thumb_url = CASE WHEN $6 THEN EXCLUDED.thumb_url ELSE day_cards.thumb_url END,
                caption = CASE WHEN $8 THEN EXCLUDED.caption ELSE day_cards.caption END,
                sticker_state = CASE WHEN $9::jsonb IS NULL THEN day_cards.sticker_state
                                     ELSE EXCLUDED.sticker_state END,
                updated_at = now()
            RETURNING {CARD_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, DayCardRow>(&sql)
            .bind(user_id)
            .bind(date)
            .bind(update.photo_url.clone().flatten())
            .bind(update.photo_url.is_some())
            .bind(update.thumb_url.clone().flatten())
            .bind(update.thumb_url.is_some())
            .bind(update.caption.clone().flatten())
            .bind(update.caption.is_some())
            .bind(update.sticker_state.clone().map(Json))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn list_stamp_assets(&self) -> StoreResult<Vec<StampAsset>> {
        let assets = sqlx::query_as::<_, StampAsset>(
            "SELECT id, key, label, asset_url, created_at FROM stamp_assets ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(assets)
    }

    async fn get_day_stamp(
        &self,
        user_id: Uuid,
        date: CalendarDate,
    ) -> StoreResult<Option<DayStampWithAsset>> {
        let row = sqlx::query_as::<_, DayStampRow>(
            r#"
            SELECT s.id, s.user_id, s.praise_date, s.stamp_asset_id, s.updated_at,
                   a.key AS asset_key, a.label AS asset_label, a.asset_url,
                   a.created_at AS asset_created_at
            FROM day_stamps s
            JOIN stamp_assets a ON a.id = s.stamp_asset_id
            WHERE s.user_id = $1 AND s.praise_date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(DayStampWithAsset::from))
    }

    async fn set_day_stamp(
        &self,
        user_id: Uuid,
        date: CalendarDate,
        stamp_asset_id: i64,
    ) -> StoreResult<DayStampWithAsset> {
        let result = sqlx::query_as::<_, DayStampRow>(
            r#"
            WITH upserted AS (
                INSERT INTO day_stamps (user_id, praise_date, stamp_asset_id, updated_at)
                VALUES ($1, $2, $3, now())
                ON CONFLICT (user_id, praise_date) DO UPDATE SET
                    stamp_asset_id = EXCLUDED.stamp_asset_id,
                    updated_at = now()
                RETURNING id, user_id, praise_date, stamp_asset_id, updated_at
            )
            SELECT u.id, u.user_id, u.praise_date, u.stamp_asset_id, u.updated_at,
                   a.key AS asset_key, a.label AS asset_label, a.asset_url,
                   a.created_at AS asset_created_at
            FROM upserted u
            JOIN stamp_assets a ON a.id = u.stamp_asset_id
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(stamp_asset_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(StoreError::NotFound(format!("stamp asset {}", stamp_asset_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_day_stamp(&self, user_id: Uuid, date: CalendarDate) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM day_stamps WHERE user_id = $1 AND praise_date = $2")
            .bind(user_id)
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
