use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One named part of a résumé carried as a before/after pair.
/// `changes` is the rationale list, kept in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub title: String,
    pub original: String,
    pub optimized: String,
    pub changes: Vec<String>,
}

/// The validated body returned by the generation service.
/// Identical to `OptimizationResult` minus the locally assigned `id` and `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationPayload {
    pub initial_score: u8,
    pub optimized_score: u8,
    pub analysis: String,
    pub sections: Vec<ResumeSection>,
    pub suggested_keywords: Vec<String>,
    pub full_optimized_resume: String,
}

/// A completed optimization. Immutable once created; appended to the user's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub id: String,
    pub date: DateTime<Utc>,
    pub initial_score: u8,
    pub optimized_score: u8,
    pub analysis: String,
    pub sections: Vec<ResumeSection>,
    pub suggested_keywords: Vec<String>,
    pub full_optimized_resume: String,
}

impl OptimizationResult {
    /// Stamps a service payload with a random id and the current time.
    pub fn from_payload(payload: OptimizationPayload) -> Self {
        Self::with_identity(payload, Uuid::new_v4().to_string(), Utc::now())
    }

    pub fn with_identity(payload: OptimizationPayload, id: String, date: DateTime<Utc>) -> Self {
        let OptimizationPayload {
            initial_score,
            optimized_score,
            analysis,
            sections,
            suggested_keywords,
            full_optimized_resume,
        } = payload;
        Self {
            id,
            date,
            initial_score,
            optimized_score,
            analysis,
            sections,
            suggested_keywords,
            full_optimized_resume,
        }
    }

    pub fn score_summary(&self) -> ScoreSummary {
        ScoreSummary::new(self.initial_score, self.optimized_score)
    }
}

/// Before/after match scores with a signed delta.
///
/// The service is not trusted to report an improvement, so a drop is shown
/// as a negative delta rather than clamped or rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub initial_score: u8,
    pub optimized_score: u8,
    pub delta: i16,
    pub delta_label: String,
}

impl ScoreSummary {
    pub fn new(initial_score: u8, optimized_score: u8) -> Self {
        let delta = optimized_score as i16 - initial_score as i16;
        let delta_label = match delta {
            d if d > 0 => format!("+{d}%"),
            d => format!("{d}%"),
        };
        Self {
            initial_score,
            optimized_score,
            delta,
            delta_label,
        }
    }
}

/// Rounds a raw service score and clamps it into the 0–100 range.
pub fn normalize_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}
