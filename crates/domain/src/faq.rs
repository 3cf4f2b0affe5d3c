//! FAQ corpus types.
//!
//! The corpus is an externally maintained, ordered list of question/answer
//! records. Answers are either plain strings (possibly containing bare
//! URLs) or structured rich payloads rendered client-side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A static question/answer record. Immutable after startup; identity is
/// the exact question string and duplicates are not rejected (the matcher
/// breaks ties by corpus order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: FaqAnswer,
}

/// An answer is a plain string or a rich payload, distinguished by JSON
/// shape rather than an explicit tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaqAnswer {
    Rich(RichPayload),
    Text(String),
}

/// Structured answer carried verbatim to the client for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RichPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Label → URL links (e.g. `"twitter": "https://..."`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub social: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_answer_deserializes_as_text() {
        let entry: FaqEntry = serde_json::from_str(
            r#"{"question": "Yaz okulu tarihleri ne zaman?", "answer": "15 Temmuz - 30 Ağustos"}"#,
        )
        .unwrap();
        assert!(matches!(entry.answer, FaqAnswer::Text(_)));
    }

    #[test]
    fn object_answer_deserializes_as_rich() {
        let entry: FaqEntry = serde_json::from_str(
            r#"{
                "question": "Sosyal medya hesaplarınız neler?",
                "answer": {
                    "title": "Bizi takip edin",
                    "social": {"twitter": "https://twitter.com/uni"}
                }
            }"#,
        )
        .unwrap();
        match entry.answer {
            FaqAnswer::Rich(rich) => {
                assert_eq!(rich.title.as_deref(), Some("Bizi takip edin"));
                assert_eq!(
                    rich.social.get("twitter").map(String::as_str),
                    Some("https://twitter.com/uni")
                );
            }
            FaqAnswer::Text(_) => panic!("expected rich payload"),
        }
    }
}
