use std::sync::Arc;

use crate::compare::cache::DiffCache;
use crate::config::Config;
use crate::ingest::DocumentParser;
use crate::optimization::optimizer::ResumeOptimizer;
use crate::optimization::pipeline::InFlight;
use crate::session::SessionManager;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    /// Pluggable optimization backend. Default: LlmResumeOptimizer.
    pub optimizer: Arc<dyn ResumeOptimizer>,
    pub parser: DocumentParser,
    /// Memoized section diffs, shared across sessions.
    pub diff_cache: Arc<DiffCache>,
    pub in_flight: Arc<InFlight>,
    pub config: Config,
}
