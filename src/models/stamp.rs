use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::dates::CalendarDate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StampAsset {
    pub id: i64,
    pub key: String,
    pub label: String,
    pub asset_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DayStamp {
    pub id: i64,
    pub user_id: Uuid,
    pub praise_date: CalendarDate,
    pub stamp_asset_id: i64,
    pub updated_at: DateTime<Utc>,
}

/// A day stamp joined with the asset it shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStampWithAsset {
    #[serde(flatten)]
    pub stamp: DayStamp,
    pub stamp_asset: StampAsset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampInput {
    pub stamp_asset_id: i64,
}
