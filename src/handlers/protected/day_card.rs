use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::parse_date;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{DayCard, DayCardUpdate};

/// GET /api/days/:date/card - `data` is null when the day has no card
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> ApiResult<Option<DayCard>> {
    let date = parse_date("date", &date)?;
    let card = state.store.get_day_card(user.user_id, date).await?;
    Ok(ApiResponse::success(card))
}

/// PUT /api/days/:date/card - merge the supplied fields into the day's card
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    body: Result<Json<DayCardUpdate>, JsonRejection>,
) -> ApiResult<DayCard> {
    let date = parse_date("date", &date)?;
    let Json(update) = body?;
    let update = update
        .normalized()
        .map_err(|msg| ApiError::validation_error(msg, None))?;

    let card = state.store.upsert_day_card(user.user_id, date, &update).await?;
    Ok(ApiResponse::success(card))
}
