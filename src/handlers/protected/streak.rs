use axum::{
    extract::{Query, State},
    Extension,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::dates::CalendarDate;
use crate::handlers::parse_date;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::streak::{self, StreakInfo};

#[derive(Debug, Deserialize)]
pub struct StreakQuery {
    pub selected: Option<String>,
    /// The caller's local date; the server date is used when absent
    pub today: Option<String>,
}

/// GET /api/streak?selected=&today= - current and selected-day streaks
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<StreakQuery>,
) -> ApiResult<StreakInfo> {
    let today = match query.today.as_deref() {
        Some(value) => Some(parse_date("today", value)?),
        None => None,
    };
    let selected = match query.selected.as_deref() {
        Some(value) => parse_date("selected", value)?,
        None => today.unwrap_or_else(CalendarDate::today),
    };

    let dates = state.store.list_entry_dates(user.user_id, None).await?;
    let active = streak::active_date_keys(dates);
    let info = match today {
        Some(today) => streak::streak_info(&active, selected.naive(), today.naive()),
        None => streak::streak_info_now(&active, selected.naive()),
    };
    Ok(ApiResponse::success(info))
}
