use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::handlers::parse_date;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{DayStampWithAsset, StampAsset, StampInput};

/// GET /api/stamps - stamp catalogue
pub async fn assets(State(state): State<AppState>) -> ApiResult<Vec<StampAsset>> {
    let assets = state.store.list_stamp_assets().await?;
    Ok(ApiResponse::success(assets))
}

/// GET /api/days/:date/stamp
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> ApiResult<Option<DayStampWithAsset>> {
    let date = parse_date("date", &date)?;
    let stamp = state.store.get_day_stamp(user.user_id, date).await?;
    Ok(ApiResponse::success(stamp))
}

/// PUT /api/days/:date/stamp - one stamp per day; replaces any existing one
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    body: Result<Json<StampInput>, JsonRejection>,
) -> ApiResult<DayStampWithAsset> {
    let date = parse_date("date", &date)?;
    let Json(input) = body?;
    let stamp = state
        .store
        .set_day_stamp(user.user_id, date, input.stamp_asset_id)
        .await?;
    Ok(ApiResponse::success(stamp))
}

/// DELETE /api/days/:date/stamp
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> ApiResult<Value> {
    let date = parse_date("date", &date)?;
    let removed = state.store.remove_day_stamp(user.user_id, date).await?;
    Ok(ApiResponse::success(json!({ "date": date, "removed": removed })))
}
