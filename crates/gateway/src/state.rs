use std::sync::Arc;

use ub_domain::config::Config;
use ub_faq::FaqMatcher;
use ub_providers::CompletionProvider;
use ub_sessions::SessionStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// FAQ matcher with corpus keys precomputed at startup.
    pub matcher: Arc<FaqMatcher>,
    /// AI completion collaborator, behind a trait for testability.
    pub llm: Arc<dyn CompletionProvider>,
    /// Live WebSocket sessions. In-memory only; lost on restart.
    pub sessions: Arc<SessionStore>,
}
