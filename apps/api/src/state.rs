use std::sync::Arc;

use crate::ranking::evaluator::ResumeEvaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable evaluator. Production: GeminiEvaluator; tests substitute a
    /// scripted double without touching handlers or the pipeline.
    pub evaluator: Arc<dyn ResumeEvaluator>,
}
