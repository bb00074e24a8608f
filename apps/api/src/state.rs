use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Primary source. The hosted client, or `DisabledSource` without a token.
    pub source: Arc<dyn CompletionSource>,
    pub config: Config,
}
