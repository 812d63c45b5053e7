//! Stateless HTTP request builder and response parser for the Mastermind API.
//!
//! # Design
//! `MastermindClient` holds only a `base_url`. Each of the three operations is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. The caller executes the
//! round-trip in between, so this module never performs I/O.
//!
//! None of the parsers look at the status code: the service signals failure
//! through the body, and deletes are fire-and-forget.

use crate::error::ApiError;
use crate::guess::Guess;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateGameResponse, ErrorResponse, Feedback, GuessReply, GuessRequest};

/// Endpoint of the public game service.
pub const DEFAULT_BASE_URL: &str = "https://mastermind.darkube.app";

/// Synchronous, stateless client for the Mastermind API.
#[derive(Debug, Clone)]
pub struct MastermindClient {
    base_url: String,
}

impl Default for MastermindClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl MastermindClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_create_game(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/game", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_submit_guess(&self, game_id: &str, guess: &Guess) -> Result<HttpRequest, ApiError> {
        let payload = GuessRequest {
            game_id: game_id.to_string(),
            guess: guess.as_str().to_string(),
        };
        let body = serde_json::to_string(&payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/guess", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete_game(&self, game_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/game/{game_id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Extract the new game's identifier.
    ///
    /// An `{"error": ...}` body is reported as `ApiError::Server`; anything
    /// else that is not `{"game_id": ...}` is a deserialization failure.
    pub fn parse_create_game(&self, response: HttpResponse) -> Result<String, ApiError> {
        let body = non_empty_body(&response)?;
        match serde_json::from_str::<CreateGameResponse>(body) {
            Ok(created) => Ok(created.game_id),
            Err(e) => match serde_json::from_str::<ErrorResponse>(body) {
                Ok(payload) => Err(ApiError::Server(payload.error)),
                Err(_) => Err(ApiError::Deserialization(e.to_string())),
            },
        }
    }

    /// Decode a guess response: feedback shape first, then error shape.
    pub fn parse_submit_guess(&self, response: HttpResponse) -> Result<Feedback, ApiError> {
        let body = non_empty_body(&response)?;
        match serde_json::from_str::<GuessReply>(body) {
            Ok(GuessReply::Feedback(feedback)) => Ok(feedback),
            Ok(GuessReply::Error(payload)) => Err(ApiError::Server(payload.error)),
            Err(_) => Err(ApiError::InvalidResponse),
        }
    }

    /// Deletion is best-effort; any response the host managed to obtain
    /// counts as success.
    pub fn parse_delete_game(&self, _response: HttpResponse) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Only a zero-length body counts as missing; whitespace goes on to decoding
/// and fails there.
fn non_empty_body(response: &HttpResponse) -> Result<&str, ApiError> {
    if response.body.is_empty() {
        return Err(ApiError::NoData);
    }
    Ok(&response.body)
}
