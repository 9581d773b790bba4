use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::export::{self, ExportMode, ExportPlan};
use crate::handlers::parse_date;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    pub mode: String,
    pub from: String,
    pub to: String,
}

/// GET /api/export/plan?mode=day|week|month&from=&to= - pages and file name for a PDF export
pub async fn plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<PlanQuery>, QueryRejection>,
) -> ApiResult<ExportPlan> {
    let Query(query) = query?;
    let mode: ExportMode = query.mode.parse()?;
    let from = parse_date("from", &query.from)?;
    let to = parse_date("to", &query.to)?;

    let plan = export::load_export_plan(state.store.as_ref(), user.user_id, mode, from, to).await?;
    Ok(ApiResponse::success(plan))
}
