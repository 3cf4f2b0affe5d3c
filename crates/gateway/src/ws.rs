//! WebSocket chat endpoint.
//!
//! Flow:
//! 1. Client connects to `GET /ws`; a session is opened and seeded with
//!    the greeting turn.
//! 2. Client sends `userMessage` events; each is answered with exactly
//!    one `botResponse` (or `error`) emission.
//! 3. Disconnect deletes the session. Messages are processed one at a
//!    time per socket, so turns within a session never interleave.

use std::net::SocketAddr;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use ub_domain::chat::{AnswerSource, Turn, TurnContent};
use ub_faq::RenderedAnswer;

use crate::runtime::{self, Reply};
use crate::state::AppState;

/// Client-visible error strings (the UI shows them verbatim).
const ERR_INVALID_MESSAGE: &str = "Geçersiz mesaj formatı veya uzunluğu";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Wire events
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    /// `{"event": "userMessage", "text": "..."}`. A non-string `text`
    /// fails deserialization and is answered with an error event.
    UserMessage { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Faq,
    Ai,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    BotResponse {
        #[serde(rename = "type")]
        kind: ResponseKind,
        content: serde_json::Value,
        metadata: serde_json::Value,
    },
    Error {
        message: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Handler
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// GET /ws — upgrade to WebSocket.
pub async fn chat_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, addr))
}

async fn handle_socket(socket: WebSocket, state: AppState, addr: SocketAddr) {
    let session_id = uuid::Uuid::new_v4().to_string();
    state
        .sessions
        .open(&session_id, &addr.to_string(), &state.config.chat.greeting);

    let (mut sink, mut stream) = socket.split();

    // One message end-to-end at a time: the provider call is awaited
    // inline, so turns within this session cannot interleave.
    while let Some(Ok(msg)) = stream.next().await {
        match msg {
            Message::Text(text) => {
                if let Some(event) = process_message(&state, &session_id, &text).await {
                    if send_event(&mut sink, &event).await.is_err() {
                        break;
                    }
                }
            }
            Message::Close(_) => break,
            // axum answers WS-level pings automatically.
            _ => {}
        }
    }

    state.sessions.close(&session_id);
}

async fn send_event(
    sink: &mut (impl SinkExt<Message> + Unpin),
    event: &ServerEvent,
) -> Result<(), ()> {
    let json = serde_json::to_string(event).map_err(|_| ())?;
    sink.send(Message::Text(json)).await.map_err(|_| ())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message processing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process one raw text frame for an open session.
///
/// Returns the event to emit, or `None` when the session is gone (a
/// message racing disconnect) — in that case nothing is written and
/// nothing is emitted.
pub async fn process_message(
    state: &AppState,
    session_id: &str,
    raw: &str,
) -> Option<ServerEvent> {
    // Boundary validation: reject before touching any session state or
    // contacting a collaborator.
    let ClientEvent::UserMessage { text } = match serde_json::from_str(raw) {
        Ok(event) => event,
        Err(_) => {
            return Some(ServerEvent::Error {
                message: ERR_INVALID_MESSAGE.to_owned(),
            });
        }
    };
    if runtime::validate_message(&text, state.config.chat.max_message_chars).is_err() {
        return Some(ServerEvent::Error {
            message: ERR_INVALID_MESSAGE.to_owned(),
        });
    }

    if state
        .sessions
        .append_turn(session_id, Turn::user(text.as_str()))
        .is_err()
    {
        return None;
    }
    let history = state.sessions.history(session_id)?;

    let reply = runtime::answer(
        &state.config,
        &state.matcher,
        state.llm.as_ref(),
        &history,
        &text,
    )
    .await;

    if state
        .sessions
        .append_turn(session_id, bot_turn(&reply))
        .is_err()
    {
        // Session closed while the provider call was in flight: the
        // response is dropped rather than written past the close.
        return None;
    }

    Some(reply_event(reply))
}

/// The turn recorded for a reply.
fn bot_turn(reply: &Reply) -> Turn {
    match reply {
        Reply::Faq { answer, .. } => {
            let content = match answer {
                RenderedAnswer::Text(text) => TurnContent::Text(text.clone()),
                RenderedAnswer::Rich(rich) => TurnContent::Rich(rich.clone()),
            };
            Turn::bot(content, AnswerSource::Faq)
        }
        Reply::Ai {
            text,
            model,
            errored,
            ..
        } => {
            let source = if *errored {
                AnswerSource::Error
            } else {
                AnswerSource::Ai
            };
            let mut turn = Turn::bot(TurnContent::Text(text.clone()), source);
            turn.model = model.clone();
            turn
        }
    }
}

/// The event emitted for a reply.
fn reply_event(reply: Reply) -> ServerEvent {
    match reply {
        Reply::Faq {
            answer,
            question,
            confidence,
        } => ServerEvent::BotResponse {
            kind: ResponseKind::Faq,
            content: rendered_content(answer),
            metadata: serde_json::json!({
                "question": question,
                "confidence": confidence,
            }),
        },
        Reply::Ai {
            text, model, usage, ..
        } => {
            let mut metadata = serde_json::json!({ "model": model });
            if let Some(u) = usage {
                metadata["usage"] = serde_json::json!({
                    "prompt_tokens": u.prompt_tokens,
                    "completion_tokens": u.completion_tokens,
                    "total_tokens": u.total_tokens,
                });
            }
            ServerEvent::BotResponse {
                kind: ResponseKind::Ai,
                content: serde_json::Value::String(text),
                metadata,
            }
        }
    }
}

/// Rich answers are tagged so the client switches to rich rendering;
/// plain answers travel as strings.
pub fn rendered_content(answer: RenderedAnswer) -> serde_json::Value {
    match answer {
        RenderedAnswer::Text(html) => serde_json::Value::String(html),
        RenderedAnswer::Rich(rich) => {
            let mut value = serde_json::to_value(&rich).unwrap_or_default();
            if let Some(obj) = value.as_object_mut() {
                obj.insert("type".into(), serde_json::Value::String("rich".into()));
            }
            value
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
