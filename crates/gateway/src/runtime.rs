//! The per-message answer pipeline: FAQ match first, completion provider
//! fallback, fixed apology when the provider fails. Shared by the
//! WebSocket chat loop, `POST /api/ask`, and the `ask` CLI command.

use ub_domain::chat::{Role, Turn};
use ub_domain::config::Config;
use ub_domain::error::{Error, Result};
use ub_faq::{render, FaqMatcher, RenderedAnswer};
use ub_providers::{ChatRequest, CompletionProvider, Usage, WireMessage};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Reply
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outcome of one message. Every variant carries something presentable:
/// the pipeline never leaves a message unanswered.
pub enum Reply {
    Faq {
        answer: RenderedAnswer,
        /// The matched corpus question, for metadata.
        question: String,
        confidence: f64,
    },
    Ai {
        text: String,
        model: Option<String>,
        usage: Option<Usage>,
        /// True when this is the fixed fallback apology substituted after
        /// a provider failure.
        errored: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Boundary check applied before any state is touched or collaborator
/// contacted.
pub fn validate_message(text: &str, max_chars: usize) -> Result<()> {
    if text.is_empty() {
        return Err(Error::InvalidMessage("empty message".into()));
    }
    let len = text.chars().count();
    if len > max_chars {
        return Err(Error::InvalidMessage(format!(
            "message length {len} exceeds {max_chars}"
        )));
    }
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Pipeline
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Answer one user message.
///
/// `history` is the accumulated turn list, current user message last
/// (stateless callers pass just that one turn). The FAQ matcher sees only
/// `message`; the provider sees the whole remapped history.
pub async fn answer(
    config: &Config,
    matcher: &FaqMatcher,
    llm: &dyn CompletionProvider,
    history: &[Turn],
    message: &str,
) -> Reply {
    if let Some(hit) = matcher.best_match(message) {
        tracing::debug!(
            question = %hit.entry.question,
            confidence = hit.confidence,
            "FAQ hit"
        );
        return Reply::Faq {
            answer: render(&hit.entry.answer),
            question: hit.entry.question.clone(),
            confidence: hit.confidence,
        };
    }

    match llm
        .complete(ChatRequest {
            messages: wire_messages(&config.llm.system_prompt, history),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
        })
        .await
    {
        Ok(resp) => Reply::Ai {
            text: resp.text,
            model: Some(resp.model),
            usage: resp.usage,
            errored: false,
        },
        Err(e) => {
            // Recovered locally: timeout, non-2xx and malformed payloads
            // all degrade to the fixed apology, emitted as a normal bot
            // response to preserve conversational flow.
            tracing::warn!(error = %e, "completion provider failed, using fallback reply");
            Reply::Ai {
                text: config.chat.fallback_reply.clone(),
                model: None,
                usage: None,
                errored: true,
            }
        }
    }
}

/// Remap the internal turn history to the provider's wire vocabulary:
/// fixed system preamble first, then every turn with `bot` relabeled
/// `assistant`. The closed [`Role`] set means every turn is forwardable.
fn wire_messages(system_prompt: &str, history: &[Turn]) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(WireMessage {
        role: Role::System.as_wire_role(),
        content: system_prompt.to_owned(),
    });
    for turn in history {
        messages.push(WireMessage {
            role: turn.role.as_wire_role(),
            content: turn.content.as_text().to_owned(),
        });
    }
    messages
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use ub_domain::config::StemmerLanguage;
    use ub_domain::error::Result;
    use ub_domain::faq::{FaqAnswer, FaqEntry};
    use ub_providers::ChatResponse;

    /// Stub collaborator: records the request it saw, replies or fails.
    struct StubProvider {
        reply: Option<ChatResponse>,
        seen: Mutex<Option<ChatRequest>>,
    }

    impl StubProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(ChatResponse {
                    text: text.into(),
                    model: "openai/gpt-3.5-turbo".into(),
                    usage: None,
                }),
                seen: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait::async_trait]
    impl CompletionProvider for StubProvider {
        async fn complete(&self, req: ChatRequest) -> Result<ChatResponse> {
            *self.seen.lock().unwrap() = Some(req);
            self.reply.clone().ok_or(Error::Timeout("stub".into()))
        }
    }

    fn test_config() -> Config {
        Config::default()
    }

    fn test_matcher() -> FaqMatcher {
        let entries = vec![FaqEntry {
            question: "Yaz okulu tarihleri ne zaman?".into(),
            answer: FaqAnswer::Text("15 Temmuz - 30 Ağustos".into()),
        }];
        FaqMatcher::new(entries, StemmerLanguage::English, 0.65)
    }

    #[test]
    fn oversized_message_is_rejected() {
        let long = "a".repeat(501);
        assert!(validate_message(&long, 500).is_err());
        assert!(validate_message(&"a".repeat(500), 500).is_ok());
        assert!(validate_message("", 500).is_err());
    }

    #[tokio::test]
    async fn faq_hit_short_circuits_the_provider() {
        let stub = StubProvider::replying("should not be called");
        let reply = answer(
            &test_config(),
            &test_matcher(),
            &stub,
            &[Turn::user("Yaz okulu tarihleri ne zaman?")],
            "Yaz okulu tarihleri ne zaman?",
        )
        .await;

        match reply {
            Reply::Faq { confidence, .. } => assert_eq!(confidence, 1.0),
            Reply::Ai { .. } => panic!("expected FAQ reply"),
        }
        assert!(stub.seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn miss_delegates_with_remapped_history() {
        let stub = StubProvider::replying("Elbette, yardımcı olayım.");
        let history = vec![
            Turn::bot(
                ub_domain::chat::TurnContent::Text("Merhaba!".into()),
                ub_domain::chat::AnswerSource::Faq,
            ),
            Turn::user("asdkjasnd"),
        ];

        let reply = answer(&test_config(), &test_matcher(), &stub, &history, "asdkjasnd").await;

        match reply {
            Reply::Ai { text, model, errored, .. } => {
                assert_eq!(text, "Elbette, yardımcı olayım.");
                assert_eq!(model.as_deref(), Some("openai/gpt-3.5-turbo"));
                assert!(!errored);
            }
            Reply::Faq { .. } => panic!("expected AI reply"),
        }

        let seen = stub.seen.lock().unwrap().clone().expect("provider not called");
        let roles: Vec<&str> = seen.messages.iter().map(|m| m.role).collect();
        // System preamble first, bot remapped to assistant, user last.
        assert_eq!(roles, vec!["system", "assistant", "user"]);
        assert_eq!(seen.messages[2].content, "asdkjasnd");
    }

    #[tokio::test]
    async fn provider_failure_yields_fallback_reply() {
        let config = test_config();
        let stub = StubProvider::failing();
        let reply = answer(
            &config,
            &test_matcher(),
            &stub,
            &[Turn::user("asdkjasnd")],
            "asdkjasnd",
        )
        .await;

        match reply {
            Reply::Ai { text, model, errored, .. } => {
                assert_eq!(text, config.chat.fallback_reply);
                assert!(model.is_none());
                assert!(errored);
            }
            Reply::Faq { .. } => panic!("expected fallback reply"),
        }
    }
}
