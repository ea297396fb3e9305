use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use tracing::info;

use crate::errors::AppError;
use crate::export::docx::{export_docx, DOCX_MIME};
use crate::session::SessionToken;
use crate::state::AppState;

/// GET /api/v1/history/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    token: SessionToken,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.sessions.load(token).await?;
    let result = session
        .user()
        .find_result(&id)
        .ok_or_else(|| AppError::NotFound(format!("Optimization {id} not found")))?;

    let artifact = export_docx(result).map_err(anyhow::Error::from)?;
    info!("Exported {} ({} bytes)", artifact.file_name, artifact.bytes.len());

    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    ))
}
