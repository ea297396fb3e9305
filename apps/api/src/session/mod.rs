//! Session context: the signed-in user's state, passed explicitly to every
//! operation that reads or changes it.
//!
//! A `Session` is created by login, loaded from the store per request, and
//! destroyed by logout. Operations mutate the in-memory copy; the caller
//! persists it with `SessionManager::save` only once the operation succeeded.

pub mod handlers;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::FileData;
use crate::models::optimization::OptimizationResult;
use crate::models::user::{PaymentMethod, Plan, User};
use crate::session::store::{decode_record, encode_record, KeyValueStore, SessionRecord};

const KEY_PREFIX: &str = "rg_user";

/// Opaque session token presented as `Authorization: Bearer <uuid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionToken(pub Uuid);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    fn store_key(&self) -> String {
        format!("{KEY_PREFIX}:{}", self.0)
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let raw = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        Uuid::parse_str(raw)
            .map(SessionToken)
            .map_err(|_| AppError::Unauthorized)
    }
}

/// One signed-in session: its token plus the stored record.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    record: SessionRecord,
}

impl Session {
    pub fn user(&self) -> &User {
        &self.record.user
    }

    pub fn resume_file(&self) -> Option<&FileData> {
        self.record.resume_file.as_ref()
    }

    pub fn set_resume_file(&mut self, file: FileData) {
        self.record.resume_file = Some(file);
    }

    /// Switches plan: usage resets to 0 and the total becomes the plan's quota.
    /// A mock payment method is attached the first time.
    pub fn select_plan(&mut self, plan: Plan) -> Result<(), AppError> {
        let user = &mut self.record.user;
        if !user.can_select(plan) {
            return Err(AppError::Validation(format!(
                "The {plan:?} plan cannot be selected for this account."
            )));
        }
        user.plan = plan;
        user.revisions_used = 0;
        user.revisions_total = plan.quota();
        if user.payment_method.is_none() {
            user.payment_method = Some(PaymentMethod::mock());
        }
        Ok(())
    }

    /// Consumes one unit of quota and puts the result at the head of the history.
    pub fn record_optimization(&mut self, result: OptimizationResult) {
        let user = &mut self.record.user;
        user.revisions_used += 1;
        user.history.insert(0, result);
    }
}

/// A pricing tier as offered to a particular caller.
#[derive(Debug, Clone, Serialize)]
pub struct PlanOffer {
    pub plan: Plan,
    pub quota: u32,
    pub current: bool,
    pub selectable: bool,
}

/// The three tiers, marked for `user` (guests can view but not select).
pub fn plan_offers(user: Option<&User>) -> Vec<PlanOffer> {
    Plan::ALL
        .iter()
        .map(|&plan| PlanOffer {
            plan,
            quota: plan.quota(),
            current: user.map(|u| u.plan == plan).unwrap_or(false),
            selectable: user.map(|u| u.can_select(plan)).unwrap_or(false),
        })
        .collect()
}

/// Creates, loads, persists and tears down sessions over a key-value store.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Signs in. Credentials are only checked for presence; a new Free user
    /// record is created for the returned token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Please enter both email and password.".to_string(),
            ));
        }

        let session = Session {
            token: SessionToken::generate(),
            record: SessionRecord::new(User::new(email)),
        };
        self.save(&session).await?;
        info!("Session {} opened", session.token);
        Ok(session)
    }

    /// Loads the session for `token`. A record that cannot be decoded is
    /// dropped and the caller is treated as signed out.
    pub async fn load(&self, token: SessionToken) -> Result<Session, AppError> {
        let key = token.store_key();
        let raw = self.store.get(&key).await?.ok_or(AppError::Unauthorized)?;

        match decode_record(&raw) {
            Ok(record) => Ok(Session { token, record }),
            Err(e) => {
                warn!("Discarding unreadable session {token}: {e}");
                self.store.delete(&key).await?;
                Err(AppError::Unauthorized)
            }
        }
    }

    pub async fn save(&self, session: &Session) -> Result<(), AppError> {
        let raw = encode_record(&session.record)?;
        self.store.set(&session.token.store_key(), raw).await?;
        Ok(())
    }

    pub async fn logout(&self, token: SessionToken) -> Result<(), AppError> {
        self.store.delete(&token.store_key()).await?;
        info!("Session {token} closed");
        Ok(())
    }
}
