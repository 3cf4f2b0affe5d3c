//! unibot configuration, loaded from a TOML file.
//!
//! Every field has a serde default so an empty (or absent) config file
//! yields a runnable local setup. Secrets are never stored in the file;
//! the API key is read from the environment variable named by
//! `llm.api_key_env`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub faq: FaqConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_3000")]
    pub port: u16,
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default)]
    pub cors: CorsConfig,
    /// Per-IP token-bucket rate limiting. `None` (the default) disables
    /// it — suitable for local development.
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
    /// Directory holding the built web client. Served statically with an
    /// `index.html` fallback when it exists; skipped otherwise.
    #[serde(default = "d_frontend_dir")]
    pub frontend_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".into(),
            cors: CorsConfig::default(),
            rate_limit: None,
            frontend_dir: d_frontend_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed for CORS. Use `["*"]` for permissive (NOT
    /// recommended). Defaults to localhost-only.
    #[serde(default = "d_cors_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: d_cors_origins(),
        }
    }
}

/// `requests_per_second` controls the replenishment rate, `burst_size`
/// how many requests a single IP may send before being throttled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u64,
    pub burst_size: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FAQ matching
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqConfig {
    /// Path to the corpus file (ordered `[{question, answer}]` JSON).
    #[serde(default = "d_faq_path")]
    pub path: PathBuf,
    /// Stemmer language applied during normalization. The corpus and user
    /// input are stemmed with the same algorithm, so an approximate
    /// stemmer still matches consistently; pick `turkish` for Turkish
    /// corpora.
    #[serde(default)]
    pub language: StemmerLanguage,
    /// Minimum similarity a corpus entry must EXCEED to count as a match.
    /// Tuned for precision: a wrong FAQ answer is worse than falling
    /// through to the completion provider.
    #[serde(default = "d_threshold")]
    pub threshold: f64,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            path: d_faq_path(),
            language: StemmerLanguage::default(),
            threshold: 0.65,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemmerLanguage {
    #[default]
    English,
    Turkish,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "d_llm_base_url")]
    pub base_url: String,
    /// Environment variable holding the bearer token.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "d_model")]
    pub model: String,
    #[serde(default = "d_temperature")]
    pub temperature: f64,
    #[serde(default = "d_max_tokens")]
    pub max_tokens: u32,
    /// Whole-request timeout. A hung provider call is failed after this,
    /// never left pending.
    #[serde(default = "d_timeout_ms")]
    pub timeout_ms: u64,
    /// Fixed system preamble prepended to every completion request.
    #[serde(default = "d_system_prompt")]
    pub system_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: d_llm_base_url(),
            api_key_env: d_api_key_env(),
            model: d_model(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_ms: 10_000,
            system_prompt: d_system_prompt(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat behavior
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Synthesized bot greeting seeding every new session's history.
    #[serde(default = "d_greeting")]
    pub greeting: String,
    /// Messages longer than this are rejected before touching any state.
    #[serde(default = "d_max_message_chars")]
    pub max_message_chars: usize,
    /// Apology substituted when the completion provider fails.
    #[serde(default = "d_fallback_reply")]
    pub fallback_reply: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: d_greeting(),
            max_message_chars: 500,
            fallback_reply: d_fallback_reply(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_3000() -> u16 {
    3000
}
fn d_host() -> String {
    "127.0.0.1".into()
}
fn d_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:*".into(),
        "http://127.0.0.1:*".into(),
    ]
}
fn d_frontend_dir() -> PathBuf {
    "frontend".into()
}
fn d_faq_path() -> PathBuf {
    "data/faq.json".into()
}
fn d_threshold() -> f64 {
    0.65
}
fn d_llm_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn d_api_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn d_model() -> String {
    "openai/gpt-3.5-turbo".into()
}
fn d_temperature() -> f64 {
    0.7
}
fn d_max_tokens() -> u32 {
    500
}
fn d_timeout_ms() -> u64 {
    10_000
}
fn d_system_prompt() -> String {
    "Sen üniversitenin resmi asistanısın. Sadece üniversiteyle ilgili konularda yardımcı ol.".into()
}
fn d_max_message_chars() -> usize {
    500
}
fn d_greeting() -> String {
    "Merhaba! Ben üniversitenin sanal asistanıyım. Size nasıl yardımcı olabilirim?".into()
}
fn d_fallback_reply() -> String {
    "Üzgünüm, bir hata oluştu. Lütfen daha sonra tekrar deneyin.".into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.server.rate_limit.is_none());
        assert_eq!(cfg.faq.threshold, 0.65);
        assert_eq!(cfg.faq.language, StemmerLanguage::English);
        assert_eq!(cfg.chat.max_message_chars, 500);
        assert_eq!(cfg.llm.timeout_ms, 10_000);
        assert_eq!(cfg.llm.model, "openai/gpt-3.5-turbo");
    }

    #[test]
    fn partial_section_keeps_sibling_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [faq]
            language = "turkish"

            [chat]
            greeting = "Selam!"

            [server.rate_limit]
            requests_per_second = 50
            burst_size = 100
            "#,
        )
        .unwrap();
        assert_eq!(cfg.faq.language, StemmerLanguage::Turkish);
        assert_eq!(cfg.faq.threshold, 0.65);
        assert_eq!(cfg.chat.greeting, "Selam!");
        assert_eq!(cfg.chat.max_message_chars, 500);
        assert_eq!(cfg.chat.fallback_reply, d_fallback_reply());
        let rl = cfg.server.rate_limit.expect("rate_limit should be Some");
        assert_eq!(rl.requests_per_second, 50);
        assert_eq!(rl.burst_size, 100);
    }
}
