//! Error types for the Mastermind client.
//!
//! # Design
//! `ApiError` covers everything that can go wrong between issuing a request
//! and holding a typed result: the host's transport failing, a body that
//! matches no known shape, or the service reporting an error payload.
//! `ValidationError` is purely local and never reaches the network.
//!
//! Display strings are the exact messages shown to the player.

use thiserror::Error;

/// Failures surfaced by `MastermindClient` parse methods and by hosts
/// executing its requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, TLS, timeout...).
    #[error("{0}")]
    Transport(String),

    /// The response body was empty.
    #[error("No data received")]
    NoData,

    /// A guess response matched neither the feedback nor the error shape.
    #[error("Invalid server response")]
    InvalidResponse,

    /// The service answered with an `{"error": ...}` payload.
    #[error("{0}")]
    Server(String),

    /// A create-game response could not be decoded.
    #[error("failed to decode response: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request: {0}")]
    Serialization(String),
}

/// Reasons a line of player input is not a well-formed guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Guess must be 4 digits long")]
    WrongLength { len: usize },

    #[error("Each digit must be between 1 and 6")]
    InvalidDigit { found: char },
}
