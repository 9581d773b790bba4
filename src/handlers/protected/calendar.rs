use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    Extension,
};
use serde::Deserialize;

use crate::aggregation::{self, MonthActivity, WeekActivity};
use crate::app::AppState;
use crate::dates::CalendarDate;
use crate::handlers::parse_date;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Any day in the wanted week; defaults to today
    pub anchor: Option<String>,
}

/// GET /api/calendar/month/:year/:month - 42-cell grid with per-day activity
pub async fn month(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<(i32, u32)>, PathRejection>,
) -> ApiResult<MonthActivity> {
    let Path((year, month)) = path?;
    let view = aggregation::load_month(state.store.as_ref(), user.user_id, year, month).await?;
    Ok(ApiResponse::success(view))
}

/// GET /api/calendar/week?anchor=YYYY-MM-DD - Monday..Sunday with per-day activity
pub async fn week(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<WeekQuery>,
) -> ApiResult<WeekActivity> {
    let anchor = match query.anchor.as_deref() {
        Some(value) => parse_date("anchor", value)?,
        None => CalendarDate::today(),
    };
    let view = aggregation::load_week(state.store.as_ref(), user.user_id, anchor).await?;
    Ok(ApiResponse::success(view))
}
