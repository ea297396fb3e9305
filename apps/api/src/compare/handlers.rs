use axum::{
    extract::{Path, State},
    Json,
};

use crate::compare::compare_result;
use crate::compare::render::ComparisonReport;
use crate::errors::AppError;
use crate::session::SessionToken;
use crate::state::AppState;

/// GET /api/v1/history/:id/compare
pub async fn handle_compare(
    State(state): State<AppState>,
    token: SessionToken,
    Path(id): Path<String>,
) -> Result<Json<ComparisonReport>, AppError> {
    let session = state.sessions.load(token).await?;
    let result = session
        .user()
        .find_result(&id)
        .ok_or_else(|| AppError::NotFound(format!("Optimization {id} not found")))?;

    Ok(Json(compare_result(&state.diff_cache, result).await))
}
