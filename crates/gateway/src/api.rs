//! Query API — the stateless request/response surface next to the chat
//! socket.
//!
//! - `GET /api/faq`  — full corpus with count
//! - `POST /api/ask` — one-shot question: FAQ match or AI fallback, no
//!   session and no turn history

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use ub_domain::chat::Turn;

use crate::runtime::{self, Reply};
use crate::state::AppState;
use crate::ws;

/// Build the API router. The WebSocket endpoint lives here too so `main`
/// assembles exactly one router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/faq", get(list_faq))
        .route("/api/ask", post(ask))
        .route("/ws", get(ws::chat_ws))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/faq
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn list_faq(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "count": state.matcher.entries().len(),
        "items": state.matcher.entries(),
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/ask
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct AskBody {
    #[serde(default)]
    pub question: Option<String>,
}

pub async fn ask(
    State(state): State<AppState>,
    Json(body): Json<AskBody>,
) -> impl IntoResponse {
    let question = match body.question.as_deref() {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return (
                axum::http::StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Soru gereklidir" })),
            )
                .into_response();
        }
    };

    // Stateless: the provider sees only this question, no history.
    let history = [Turn::user(question)];
    let reply = runtime::answer(
        &state.config,
        &state.matcher,
        state.llm.as_ref(),
        &history,
        question,
    )
    .await;

    let body = match reply {
        Reply::Faq {
            answer, question, ..
        } => serde_json::json!({
            "source": "faq",
            "answer": ws::rendered_content(answer),
            "question": question,
        }),
        Reply::Ai { text, model, .. } => serde_json::json!({
            "source": "ai",
            "answer": text,
            "model": model,
        }),
    };
    Json(body).into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
