//! Conversation types shared by the session store, the message pipeline,
//! and the completion provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::faq::RichPayload;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Roles
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Who authored a turn. A closed set: the internal `Bot` role maps to the
/// completion API's `assistant` vocabulary via [`Role::as_wire_role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Bot,
}

impl Role {
    /// The role label expected by the chat-completions wire format.
    pub fn as_wire_role(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Bot => "assistant",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Turns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where a bot answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// Matched against the static FAQ corpus.
    Faq,
    /// Produced by the completion provider.
    Ai,
    /// Fixed apology substituted after a provider failure.
    Error,
}

/// Content of a turn: plain text or a structured rich answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnContent {
    Text(String),
    Rich(RichPayload),
}

impl TurnContent {
    /// Text rendition sent to the completion provider. Rich payloads fall
    /// back to their `text` field so history stays representable.
    pub fn as_text(&self) -> &str {
        match self {
            TurnContent::Text(t) => t,
            TurnContent::Rich(rich) => rich.text.as_deref().unwrap_or(""),
        }
    }
}

/// One recorded message within a session. Append-only: never mutated
/// after insertion into the turn list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: TurnContent,
    pub timestamp: DateTime<Utc>,
    /// Set on bot turns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AnswerSource>,
    /// Model identifier for AI-sourced turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: TurnContent::Text(text.into()),
            timestamp: Utc::now(),
            source: None,
            model: None,
        }
    }

    pub fn bot(content: TurnContent, source: AnswerSource) -> Self {
        Self {
            role: Role::Bot,
            content,
            timestamp: Utc::now(),
            source: Some(source),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_role_maps_to_assistant_on_the_wire() {
        assert_eq!(Role::Bot.as_wire_role(), "assistant");
        assert_eq!(Role::User.as_wire_role(), "user");
        assert_eq!(Role::System.as_wire_role(), "system");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Bot).unwrap(), "\"bot\"");
        assert_eq!(
            serde_json::to_string(&AnswerSource::Faq).unwrap(),
            "\"faq\""
        );
    }

    #[test]
    fn turn_content_text_extraction() {
        let plain = TurnContent::Text("merhaba".into());
        assert_eq!(plain.as_text(), "merhaba");

        let rich = TurnContent::Rich(RichPayload {
            title: Some("Kayıt".into()),
            image: None,
            text: Some("Kayıt bilgileri".into()),
            social: Default::default(),
        });
        assert_eq!(rich.as_text(), "Kayıt bilgileri");
    }

    #[test]
    fn bot_turn_carries_source_and_model() {
        let turn = Turn::bot(TurnContent::Text("cevap".into()), AnswerSource::Ai)
            .with_model("openai/gpt-3.5-turbo");
        assert_eq!(turn.role, Role::Bot);
        assert_eq!(turn.source, Some(AnswerSource::Ai));
        assert_eq!(turn.model.as_deref(), Some("openai/gpt-3.5-turbo"));
    }
}
