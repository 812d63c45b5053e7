//! Interactive terminal client for the Mastermind game service.
//!
//! # Overview
//! `controller` runs the read/validate/submit/report loop, `api` executes the
//! core crate's HTTP requests with reqwest, and `config` reads the endpoint
//! and timeout from the environment.

pub mod api;
pub mod config;
pub mod controller;

pub use api::{GameApi, HttpGameApi};
pub use config::Config;
pub use controller::{Controller, Flow, Outcome, SessionState};
