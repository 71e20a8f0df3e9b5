use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::messages::drafts::DraftStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Redis in deployed environments, memory when `REDIS_URL` is unset.
    pub drafts: Arc<dyn DraftStore>,
    /// AI authoring backend. `LlmClient` in production, a fake in tests.
    pub generator: Arc<dyn TextGenerator>,
}
