//! One optimization attempt from request to persisted result.
//!
//! The attempt is all-or-nothing: the session is only written after the
//! optimizer returned a fully validated payload, so a failure leaves quota
//! and history exactly as they were.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::optimization::OptimizationResult;
use crate::optimization::optimizer::ResumeOptimizer;
use crate::session::{plan_offers, PlanOffer, Session, SessionManager, SessionToken};

/// Sessions with an optimization currently running.
#[derive(Default)]
pub struct InFlight {
    active: Mutex<HashSet<SessionToken>>,
}

impl InFlight {
    /// Marks `token` busy, or returns `None` if it already is.
    pub fn try_acquire(self: &Arc<Self>, token: SessionToken) -> Option<InFlightGuard> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(token) {
            return None;
        }
        Some(InFlightGuard {
            registry: Arc::clone(self),
            token,
        })
    }

    pub fn is_active(&self, token: SessionToken) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&token)
    }
}

/// Releases the session's slot when dropped, whatever the outcome.
pub struct InFlightGuard {
    registry: Arc<InFlight>,
    token: SessionToken,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.token);
    }
}

/// Inputs after defaults have been applied.
#[derive(Debug, Clone, Default)]
pub struct OptimizeInput {
    pub job_description: String,
    /// Falls back to the session's uploaded résumé when absent.
    pub resume_text: Option<String>,
}

#[derive(Debug)]
pub enum OptimizeOutcome {
    Completed(OptimizationResult),
    /// Quota is used up; the caller must pick a plan first. Nothing was recorded.
    PlanSelectionRequired(Vec<PlanOffer>),
}

/// Runs one optimization for the session behind `token`.
///
/// The in-flight slot is taken before the session is read, so the quota
/// check always sees the result of any earlier attempt.
pub async fn run_optimization(
    sessions: &SessionManager,
    optimizer: &dyn ResumeOptimizer,
    in_flight: &Arc<InFlight>,
    token: SessionToken,
    input: OptimizeInput,
) -> Result<OptimizeOutcome, AppError> {
    let _guard = in_flight.try_acquire(token).ok_or_else(|| {
        AppError::Conflict("An optimization is already running for this session.".to_string())
    })?;

    let session = sessions.load(token).await?;

    let resume_text = input
        .resume_text
        .filter(|text| !text.trim().is_empty())
        .or_else(|| session.resume_file().map(|file| file.content.clone()))
        .ok_or_else(|| AppError::Validation("Please upload your résumé first.".to_string()))?;
    if input.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please paste the job description.".to_string(),
        ));
    }

    if session.user().is_quota_exhausted() {
        info!("Session {token} has no optimizations left, plan selection required");
        return Ok(plan_selection(&session));
    }

    let payload = optimizer
        .optimize(&resume_text, &input.job_description)
        .await?;
    let result = OptimizationResult::from_payload(payload);

    // Reload so changes made while the request was pending are not overwritten.
    let mut session = sessions.load(token).await?;
    if session.user().is_quota_exhausted() {
        warn!(
            "Session {token} lost its quota while optimization {} was pending, result dropped",
            result.id
        );
        return Ok(plan_selection(&session));
    }
    session.record_optimization(result.clone());
    sessions.save(&session).await?;

    info!(
        "Session {token} completed optimization {} ({}/{} used)",
        result.id,
        session.user().revisions_used,
        session.user().revisions_total
    );
    Ok(OptimizeOutcome::Completed(result))
}

fn plan_selection(session: &Session) -> OptimizeOutcome {
    OptimizeOutcome::PlanSelectionRequired(plan_offers(Some(session.user())))
}
