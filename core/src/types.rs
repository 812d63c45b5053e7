//! Wire DTOs for the Mastermind service.
//!
//! # Design
//! The guess endpoint has no status-code contract: a body is either a
//! `Feedback` object or an `ErrorResponse` object. `GuessReply` encodes that
//! as an untagged enum whose variant order is the decode order, so a body
//! carrying both shapes' fields counts as feedback.

use serde::{Deserialize, Serialize};

use crate::guess::CODE_LENGTH;

/// Marker for a digit in the correct position.
pub const BLACK_MARKER: char = 'B';

/// Marker for a correct digit in the wrong position.
pub const WHITE_MARKER: char = 'W';

/// Body of a successful `POST /game`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateGameResponse {
    pub game_id: String,
}

/// Body of `POST /guess`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuessRequest {
    pub game_id: String,
    pub guess: String,
}

/// Score for one guess. `black + white <= 4` is the server's invariant and
/// is not re-checked here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
    pub black: u32,
    pub white: u32,
}

impl Feedback {
    /// All black markers, then all white markers, e.g. `{2, 1}` -> `"BBW"`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.extend(std::iter::repeat(BLACK_MARKER).take(self.black as usize));
        out.extend(std::iter::repeat(WHITE_MARKER).take(self.white as usize));
        out
    }

    /// Every digit in place. `white` is irrelevant.
    pub fn is_win(&self) -> bool {
        self.black as usize == CODE_LENGTH
    }
}

/// Error payload returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Either shape a guess response can take.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum GuessReply {
    Feedback(Feedback),
    Error(ErrorResponse),
}
