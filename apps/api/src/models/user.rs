use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::optimization::OptimizationResult;

/// Subscription tier. Each tier grants a fixed number of optimizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    Free,
    Basic,
    Advanced,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Free, Plan::Basic, Plan::Advanced];

    /// Optimizations granted when the plan is selected.
    pub fn quota(&self) -> u32 {
        match self {
            Plan::Free => 1,
            Plan::Basic => 5,
            Plan::Advanced => 20,
        }
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, Plan::Free)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub method_type: String,
    pub last4: String,
}

impl PaymentMethod {
    /// Placeholder attached on first plan purchase; payments are handled elsewhere.
    pub fn mock() -> Self {
        Self {
            method_type: "Mock".to_string(),
            last4: "4242".to_string(),
        }
    }
}

/// The persisted user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub plan: Plan,
    pub revisions_used: u32,
    pub revisions_total: u32,
    /// Newest first.
    pub history: Vec<OptimizationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

impl User {
    /// A freshly signed-in user on the Free tier.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            plan: Plan::Free,
            revisions_used: 0,
            revisions_total: Plan::Free.quota(),
            history: Vec::new(),
            payment_method: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.revisions_total.saturating_sub(self.revisions_used)
    }

    pub fn is_quota_exhausted(&self) -> bool {
        self.revisions_used >= self.revisions_total
    }

    pub fn quota_percent(&self) -> f64 {
        if self.revisions_total == 0 {
            return 100.0;
        }
        (self.revisions_used as f64 / self.revisions_total as f64 * 100.0).min(100.0)
    }

    /// Whether `plan` may be picked from the pricing surface.
    ///
    /// Free is granted once at sign-in: it cannot be renewed and a paid user
    /// cannot drop back to it, so it is never selectable for a signed-in user.
    pub fn can_select(&self, plan: Plan) -> bool {
        plan.is_paid()
    }

    pub fn find_result(&self, id: &str) -> Option<&OptimizationResult> {
        self.history.iter().find(|r| r.id == id)
    }
}

/// One row of the dashboard history list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub date: DateTime<Utc>,
    pub initial_score: u8,
    pub optimized_score: u8,
    pub delta_label: String,
}

impl From<&OptimizationResult> for HistoryItem {
    fn from(result: &OptimizationResult) -> Self {
        let summary = result.score_summary();
        Self {
            id: result.id.clone(),
            date: result.date,
            initial_score: summary.initial_score,
            optimized_score: summary.optimized_score,
            delta_label: summary.delta_label,
        }
    }
}
