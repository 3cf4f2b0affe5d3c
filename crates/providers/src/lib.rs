//! AI completion collaborator.
//!
//! The gateway talks to the external chat-completions API only through
//! [`CompletionProvider`], so the message pipeline can be tested with a
//! stub and the HTTP adapter swapped without touching session logic.

pub mod openrouter;

pub use openrouter::OpenRouterProvider;

use ub_domain::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One wire-format message: role already remapped to the external
/// vocabulary (`system` / `user` / `assistant`).
#[derive(Debug, Clone)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

/// A completion request. The caller supplies the full ordered message
/// list, fixed system preamble included.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<WireMessage>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Textual content of the completion.
    pub text: String,
    /// The model that actually produced the response.
    pub model: String,
    pub usage: Option<Usage>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Provider trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A chat-completions backend. Calls are bounded by the adapter's request
/// timeout; any failure (timeout, non-2xx, malformed payload) surfaces as
/// an `Err` the caller recovers from locally.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, req: ChatRequest) -> Result<ChatResponse>;
}
