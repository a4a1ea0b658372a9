use std::sync::Arc;

use crate::llm_client::ChatCompletion;
use crate::store::PreferenceStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Default: PgPreferenceStore. Tests use the in-memory store.
    pub store: Arc<dyn PreferenceStore>,
    /// Chat-completion backend asked for the final ranking. Default: LlmClient.
    pub advisor: Arc<dyn ChatCompletion>,
}
