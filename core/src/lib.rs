//! Sans-IO client core for the Mastermind game service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and validates guesses before
//! they are ever sent. The host executes the HTTP round-trip.
//!
//! # Design
//! - `MastermindClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and every protocol decision is unit-testable.
//! - Guess responses are a two-shape union decided by body shape, never by
//!   status code (see `types::GuessReply`).

pub mod client;
pub mod error;
pub mod guess;
pub mod http;
pub mod types;

pub use client::{MastermindClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ValidationError};
pub use guess::{Guess, CODE_LENGTH};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateGameResponse, ErrorResponse, Feedback, GuessReply, GuessRequest};
