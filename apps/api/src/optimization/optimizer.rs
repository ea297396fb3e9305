//! Optimization boundary: the one call out to the text-generation service.
//!
//! `AppState` holds an `Arc<dyn ResumeOptimizer>`; the production backend is
//! `LlmResumeOptimizer`, tests plug in canned responders.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::optimization::OptimizationPayload;
use crate::optimization::prompts::{OPTIMIZE_PERSONA, OPTIMIZE_PROMPT_TEMPLATE};
use crate::optimization::validation::validate_payload;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("API key not found in environment")]
    MissingCredential,

    #[error("Empty response from AI")]
    EmptyResponse,

    #[error("Malformed response from AI: {0}")]
    MalformedResponse(String),

    /// Transport or service failure, message passed through verbatim.
    #[error("{0}")]
    Service(String),
}

impl From<LlmError> for OptimizeError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => OptimizeError::MissingCredential,
            LlmError::EmptyContent => OptimizeError::EmptyResponse,
            LlmError::Parse(e) => OptimizeError::MalformedResponse(e.to_string()),
            other => OptimizeError::Service(other.to_string()),
        }
    }
}

/// Accepts résumé text and job-description text; returns a validated payload
/// or one of the named failures. Never returns a partial result.
#[async_trait]
pub trait ResumeOptimizer: Send + Sync {
    async fn optimize(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<OptimizationPayload, OptimizeError>;
}

/// Production backend over the shared `LlmClient`.
pub struct LlmResumeOptimizer {
    llm: LlmClient,
}

impl LlmResumeOptimizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeOptimizer for LlmResumeOptimizer {
    async fn optimize(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<OptimizationPayload, OptimizeError> {
        if !self.llm.has_credential() {
            return Err(OptimizeError::MissingCredential);
        }

        let prompt = build_prompt(resume_text, job_description);
        let system = format!("{OPTIMIZE_PERSONA} {JSON_ONLY_SYSTEM}");
        let raw: Value = self.llm.call_json(&prompt, &system).await?;

        let payload = parse_response(&raw)?;
        info!(
            "Optimization response accepted: {} sections, score {} -> {}",
            payload.sections.len(),
            payload.initial_score,
            payload.optimized_score
        );
        Ok(payload)
    }
}

pub fn build_prompt(resume_text: &str, job_description: &str) -> String {
    OPTIMIZE_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{job_description}", job_description)
}

/// Turns a decoded service response into a payload, or `MalformedResponse`.
pub fn parse_response(raw: &Value) -> Result<OptimizationPayload, OptimizeError> {
    validate_payload(raw).map_err(|e| {
        warn!("Rejected optimization response: {e}");
        OptimizeError::MalformedResponse(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_prompt_substitutes_inputs() {
        let prompt = build_prompt("RESUME BODY", "JD BODY");
        assert!(prompt.contains("RESUME:\nRESUME BODY"));
        assert!(prompt.contains("JOB DESCRIPTION:\nJD BODY"));
        assert!(!prompt.contains("{resume_text}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_parse_response_malformed() {
        let err = parse_response(&json!({"initialScore": 10})).unwrap_err();
        assert!(matches!(err, OptimizeError::MalformedResponse(_)));
    }

    #[test]
    fn test_llm_errors_map_to_named_failures() {
        assert!(matches!(
            OptimizeError::from(LlmError::MissingCredential),
            OptimizeError::MissingCredential
        ));
        assert!(matches!(
            OptimizeError::from(LlmError::EmptyContent),
            OptimizeError::EmptyResponse
        ));
        let parse = serde_json::from_str::<Value>("not json").unwrap_err();
        assert!(matches!(
            OptimizeError::from(LlmError::Parse(parse)),
            OptimizeError::MalformedResponse(_)
        ));
    }

    #[test]
    fn test_service_error_message_passes_through() {
        let err = OptimizeError::from(LlmError::Api {
            status: 400,
            message: "prompt is too long".to_string(),
        });
        assert_eq!(err.to_string(), "API error (status 400): prompt is too long");
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let optimizer = LlmResumeOptimizer::new(LlmClient::new(None).unwrap());
        let err = optimizer.optimize("resume", "jd").await.unwrap_err();
        assert!(matches!(err, OptimizeError::MissingCredential));
    }
}
