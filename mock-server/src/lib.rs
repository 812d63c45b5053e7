//! Scripted stand-in for the Mastermind service, used by client tests.
//!
//! It does not play the game. `POST /game` hands out a fixed identifier,
//! `POST /guess` replies with the next canned body from a queue, and every
//! request is recorded so tests can assert on what the client sent.

use std::{collections::VecDeque, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// One request observed by the stub.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    CreateGame,
    Guess { game_id: String, guess: String },
    DeleteGame { game_id: String },
}

#[derive(Deserialize)]
pub struct GuessBody {
    pub game_id: String,
    pub guess: String,
}

#[derive(Serialize)]
struct Created {
    game_id: String,
}

#[derive(Debug, Default)]
struct Inner {
    replies: VecDeque<String>,
    calls: Vec<Call>,
}

/// Shared stub state: the game id to hand out, queued guess replies, and
/// the call log.
#[derive(Clone, Debug)]
pub struct Stub {
    game_id: String,
    inner: Arc<RwLock<Inner>>,
}

impl Default for Stub {
    fn default() -> Self {
        Self::with_game_id(&Uuid::new_v4().to_string())
    }
}

impl Stub {
    pub fn with_game_id(game_id: &str) -> Self {
        Self {
            game_id: game_id.to_string(),
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Queue a raw body for the next unanswered `POST /guess`.
    pub async fn push_reply(&self, body: impl Into<String>) {
        self.inner.write().await.replies.push_back(body.into());
    }

    /// Queue a `{"black", "white"}` reply.
    pub async fn push_feedback(&self, black: u8, white: u8) {
        self.push_reply(serde_json::json!({ "black": black, "white": white }).to_string())
            .await;
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.inner.read().await.calls.clone()
    }
}

pub fn app(stub: Stub) -> Router {
    Router::new()
        .route("/game", post(create_game))
        .route("/game/{id}", delete(delete_game))
        .route("/guess", post(submit_guess))
        .with_state(stub)
}

pub async fn run(listener: TcpListener, stub: Stub) -> Result<(), std::io::Error> {
    axum::serve(listener, app(stub)).await
}

async fn create_game(State(stub): State<Stub>) -> Json<Created> {
    stub.inner.write().await.calls.push(Call::CreateGame);
    Json(Created {
        game_id: stub.game_id.clone(),
    })
}

/// Replies are sent verbatim with status 200, malformed or not; the client
/// must tell them apart by shape.
async fn submit_guess(State(stub): State<Stub>, Json(input): Json<GuessBody>) -> (StatusCode, String) {
    let mut inner = stub.inner.write().await;
    inner.calls.push(Call::Guess {
        game_id: input.game_id.clone(),
        guess: input.guess,
    });
    if input.game_id != stub.game_id {
        return (StatusCode::NOT_FOUND, r#"{"error":"game not found"}"#.to_string());
    }
    match inner.replies.pop_front() {
        Some(body) => (StatusCode::OK, body),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"no scripted reply"}"#.to_string(),
        ),
    }
}

async fn delete_game(State(stub): State<Stub>, Path(id): Path<String>) -> StatusCode {
    let mut inner = stub.inner.write().await;
    let known = id == stub.game_id;
    inner.calls.push(Call::DeleteGame { game_id: id });
    if known {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
