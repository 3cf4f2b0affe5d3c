//! In-memory session store.
//!
//! One session per live connection: inserted on connect, deleted on
//! disconnect, read/appended by the message pipeline in between. Nothing
//! is persisted — the whole store is lost on process restart, by design.
//!
//! Lifecycle is OPEN → CLOSED and nothing else. `append_turn` after close
//! reports `SessionGone` rather than resurrecting the entry, so a message
//! racing a disconnect degrades to a no-op instead of writing to a
//! deleted session.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use ub_domain::chat::{AnswerSource, Role, Turn, TurnContent};
use ub_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One connected client's conversation state.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Opaque identifier, equal to the connection's identifier.
    pub id: String,
    /// Originating address, as reported by the transport.
    pub addr: String,
    pub created_at: DateTime<Utc>,
    /// Ordered, append-only turn list. Always starts with the greeting.
    pub turns: Vec<Turn>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session, seeding its history with the synthesized bot
    /// greeting before any user input is recorded.
    pub fn open(&self, id: &str, addr: &str, greeting: &str) {
        let greeting_turn = Turn {
            role: Role::Bot,
            content: TurnContent::Text(greeting.to_owned()),
            timestamp: Utc::now(),
            source: None,
            model: None,
        };
        let session = Session {
            id: id.to_owned(),
            addr: addr.to_owned(),
            created_at: Utc::now(),
            turns: vec![greeting_turn],
        };

        self.sessions.write().insert(id.to_owned(), session);
        tracing::info!(session_id = %id, addr = %addr, "session opened");
    }

    /// Append a turn. Fails with [`Error::SessionGone`] when the session
    /// has already been closed.
    pub fn append_turn(&self, id: &str, turn: Turn) -> Result<()> {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(id) {
            Some(session) => {
                session.turns.push(turn);
                Ok(())
            }
            None => Err(Error::SessionGone(id.to_owned())),
        }
    }

    /// Snapshot of a session's turn list, oldest first.
    pub fn history(&self, id: &str) -> Option<Vec<Turn>> {
        self.sessions.read().get(id).map(|s| s.turns.clone())
    }

    /// Close and delete a session. Idempotent.
    pub fn close(&self, id: &str) {
        if self.sessions.write().remove(id).is_some() {
            tracing::info!(session_id = %id, "session closed");
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: &str = "Merhaba! Size nasıl yardımcı olabilirim?";

    #[test]
    fn open_seeds_exactly_one_greeting_turn() {
        let store = SessionStore::new();
        store.open("s1", "127.0.0.1", GREETING);

        let turns = store.history("s1").unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::Bot);
        assert_eq!(turns[0].content.as_text(), GREETING);
    }

    #[test]
    fn faq_exchange_grows_history_to_three_turns() {
        let store = SessionStore::new();
        store.open("s1", "127.0.0.1", GREETING);

        store.append_turn("s1", Turn::user("Yaz okulu ne zaman?")).unwrap();
        store
            .append_turn(
                "s1",
                Turn::bot(TurnContent::Text("15 Temmuz".into()), AnswerSource::Faq),
            )
            .unwrap();

        let turns = store.history("s1").unwrap();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].role, Role::User);
        assert_eq!(turns[2].source, Some(AnswerSource::Faq));
    }

    #[test]
    fn close_removes_the_session() {
        let store = SessionStore::new();
        store.open("s1", "127.0.0.1", GREETING);
        assert!(store.contains("s1"));

        store.close("s1");
        assert!(!store.contains("s1"));
        assert!(store.history("s1").is_none());

        // Idempotent.
        store.close("s1");
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn append_after_close_is_session_gone() {
        let store = SessionStore::new();
        store.open("s1", "127.0.0.1", GREETING);
        store.close("s1");

        let err = store.append_turn("s1", Turn::user("geç kaldım")).unwrap_err();
        assert!(matches!(err, Error::SessionGone(_)));
    }

    #[test]
    fn sessions_are_independent() {
        let store = SessionStore::new();
        store.open("s1", "10.0.0.1", GREETING);
        store.open("s2", "10.0.0.2", GREETING);

        store.append_turn("s1", Turn::user("birinci")).unwrap();
        assert_eq!(store.history("s1").unwrap().len(), 2);
        assert_eq!(store.history("s2").unwrap().len(), 1);
        assert_eq!(store.len(), 2);
    }
}
