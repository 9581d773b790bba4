use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::parse_date;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::praise::normalize_content;
use crate::models::{Praise, PraiseInput};

/// GET /api/days/:date/praises - newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> ApiResult<Vec<Praise>> {
    let date = parse_date("date", &date)?;
    let praises = state.store.list_praises(user.user_id, date).await?;
    Ok(ApiResponse::success(praises))
}

/// POST /api/days/:date/praises - add a praise to the day
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    body: Result<Json<PraiseInput>, JsonRejection>,
) -> ApiResult<Praise> {
    let date = parse_date("date", &date)?;
    let Json(input) = body?;
    let content = normalize_content(&input.content)
        .map_err(|msg| ApiError::field_error("content", msg))?;

    let praise = state.store.insert_praise(user.user_id, date, &content).await?;
    Ok(ApiResponse::created(praise))
}

/// PUT /api/praises/:id - replace the content of an owned praise
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<PraiseInput>, JsonRejection>,
) -> ApiResult<Praise> {
    let Path(id) = path?;
    let Json(input) = body?;
    let content = normalize_content(&input.content)
        .map_err(|msg| ApiError::field_error("content", msg))?;

    let praise = state.store.update_praise(user.user_id, id, &content).await?;
    Ok(ApiResponse::success(praise))
}

/// DELETE /api/praises/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    state.store.delete_praise(user.user_id, id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
