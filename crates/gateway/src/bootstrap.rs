//! AppState construction shared by `serve` and the one-shot `ask`
//! command, so both boot the same way without an HTTP listener.

use std::sync::Arc;

use anyhow::Context;

use ub_domain::config::Config;
use ub_domain::error::{Error, Result};
use ub_faq::FaqMatcher;
use ub_providers::{ChatRequest, ChatResponse, CompletionProvider, OpenRouterProvider};
use ub_sessions::SessionStore;

use crate::state::AppState;

/// Load the corpus, wire up the matcher, provider and session store.
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    let corpus = ub_faq::load_corpus(&config.faq.path)
        .with_context(|| format!("loading FAQ corpus from {}", config.faq.path.display()))?;

    let matcher = Arc::new(FaqMatcher::new(
        corpus,
        config.faq.language,
        config.faq.threshold,
    ));
    tracing::info!(
        entries = matcher.entries().len(),
        language = ?config.faq.language,
        threshold = config.faq.threshold,
        "FAQ matcher ready"
    );

    let llm = build_provider(&config);

    Ok(AppState {
        config: config.clone(),
        matcher,
        llm,
        sessions: Arc::new(SessionStore::new()),
    })
}

/// Build the completion provider. A missing API key is not fatal: FAQ
/// matching keeps working and misses get the fallback apology, so the
/// server stays available without credentials.
fn build_provider(config: &Config) -> Arc<dyn CompletionProvider> {
    match OpenRouterProvider::from_config(&config.llm) {
        Ok(provider) => {
            tracing::info!(
                base_url = %config.llm.base_url,
                model = %config.llm.model,
                timeout_ms = config.llm.timeout_ms,
                "completion provider ready"
            );
            Arc::new(provider)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "completion provider unavailable — FAQ misses will get the fallback reply"
            );
            Arc::new(UnconfiguredProvider)
        }
    }
}

/// Stand-in provider installed when no API key is configured. Every call
/// fails, which the pipeline already recovers from.
struct UnconfiguredProvider;

#[async_trait::async_trait]
impl CompletionProvider for UnconfiguredProvider {
    async fn complete(&self, _req: ChatRequest) -> Result<ChatResponse> {
        Err(Error::Provider {
            provider: "openrouter".into(),
            message: "no API key configured".into(),
        })
    }
}
