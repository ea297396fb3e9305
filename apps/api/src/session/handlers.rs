use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::optimization::OptimizationResult;
use crate::models::user::{HistoryItem, PaymentMethod, Plan, User};
use crate::session::{plan_offers, PlanOffer, SessionToken};
use crate::state::AppState;

/// Usage above this percentage is flagged on the dashboard.
const QUOTA_DANGER_PERCENT: f64 = 80.0;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: SessionToken,
    pub user: User,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub email: String,
    pub plan: Plan,
    pub revisions_used: u32,
    pub revisions_total: u32,
    pub remaining: u32,
    pub quota_percent: f64,
    pub quota_danger: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub history: Vec<HistoryItem>,
}

impl From<&User> for DashboardResponse {
    fn from(user: &User) -> Self {
        let quota_percent = user.quota_percent();
        Self {
            email: user.email.clone(),
            plan: user.plan,
            revisions_used: user.revisions_used,
            revisions_total: user.revisions_total,
            remaining: user.remaining(),
            quota_percent,
            quota_danger: quota_percent > QUOTA_DANGER_PERCENT,
            payment_method: user.payment_method.clone(),
            history: user.history.iter().map(HistoryItem::from).collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct SelectPlanRequest {
    pub plan: Plan,
}

/// POST /api/v1/session
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let session = state.sessions.login(&req.email, &req.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token: session.token,
            user: session.user().clone(),
        }),
    ))
}

/// DELETE /api/v1/session
pub async fn handle_logout(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<StatusCode, AppError> {
    state.sessions.logout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/session
pub async fn handle_dashboard(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<DashboardResponse>, AppError> {
    let session = state.sessions.load(token).await?;
    Ok(Json(DashboardResponse::from(session.user())))
}

/// GET /api/v1/plans
/// Guests see the tiers without being able to pick one.
pub async fn handle_plans(
    State(state): State<AppState>,
    token: Option<SessionToken>,
) -> Result<Json<Vec<PlanOffer>>, AppError> {
    let session = match token {
        Some(token) => state.sessions.load(token).await.ok(),
        None => None,
    };
    Ok(Json(plan_offers(session.as_ref().map(|s| s.user()))))
}

/// POST /api/v1/session/plan
pub async fn handle_select_plan(
    State(state): State<AppState>,
    token: SessionToken,
    Json(req): Json<SelectPlanRequest>,
) -> Result<Json<DashboardResponse>, AppError> {
    let mut session = state.sessions.load(token).await?;
    session.select_plan(req.plan)?;
    state.sessions.save(&session).await?;

    info!("Session {token} switched to {:?} plan", req.plan);
    Ok(Json(DashboardResponse::from(session.user())))
}

/// GET /api/v1/history
pub async fn handle_history(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<Vec<OptimizationResult>>, AppError> {
    let session = state.sessions.load(token).await?;
    Ok(Json(session.user().history.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_danger_above_eighty_percent() {
        let mut user = User::new("jane@example.com");
        user.plan = Plan::Basic;
        user.revisions_total = 5;
        user.revisions_used = 4;
        let dashboard = DashboardResponse::from(&user);
        assert_eq!(dashboard.remaining, 1);
        assert!(!dashboard.quota_danger);

        user.revisions_used = 5;
        let dashboard = DashboardResponse::from(&user);
        assert_eq!(dashboard.remaining, 0);
        assert!(dashboard.quota_danger);
    }

    #[test]
    fn test_login_request_tolerates_missing_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"email":"jane@example.com"}"#).unwrap();
        assert!(req.password.is_empty());
    }
}
