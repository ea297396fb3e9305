use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::optimization::pipeline::{run_optimization, OptimizeInput, OptimizeOutcome};
use crate::session::SessionToken;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub job_description: String,
    pub resume_text: Option<String>,
}

/// POST /api/v1/optimize
/// 200 with the result, or 402 with the plans when the quota is used up.
pub async fn handle_optimize(
    State(state): State<AppState>,
    token: SessionToken,
    Json(req): Json<OptimizeRequest>,
) -> Result<Response, AppError> {
    let input = OptimizeInput {
        job_description: req.job_description,
        resume_text: req.resume_text,
    };
    let outcome = run_optimization(
        &state.sessions,
        state.optimizer.as_ref(),
        &state.in_flight,
        token,
        input,
    )
    .await?;

    Ok(match outcome {
        OptimizeOutcome::Completed(result) => (StatusCode::OK, Json(result)).into_response(),
        OptimizeOutcome::PlanSelectionRequired(plans) => (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({
                "status": "plan_selection_required",
                "plans": plans
            })),
        )
            .into_response(),
    })
}
