use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::models::document::FileData;
use crate::session::SessionToken;
use crate::state::AppState;

/// POST /api/v1/documents
/// Multipart upload, field `file`. With a session token the parsed file
/// becomes the session's current résumé.
pub async fn handle_upload(
    State(state): State<AppState>,
    token: Option<SessionToken>,
    mut multipart: Multipart,
) -> Result<Json<FileData>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;
        upload = Some((name, bytes));
        break;
    }

    let (name, bytes) =
        upload.ok_or_else(|| AppError::Validation("Please choose a file to upload.".to_string()))?;
    let file = state.parser.parse(&name, bytes.to_vec()).await?;

    if let Some(token) = token {
        let mut session = state.sessions.load(token).await?;
        session.set_resume_file(file.clone());
        state.sessions.save(&session).await?;
    }

    Ok(Json(file))
}
