//! Network side of the game: executes the core crate's requests.
//!
//! # Design
//! `GameApi` is the seam between the session controller and the network.
//! `HttpGameApi` is the host in the host-does-IO split: it takes the plain
//! `HttpRequest` values built by `MastermindClient`, runs them with reqwest,
//! and hands the raw `HttpResponse` back to the matching `parse_*` method.
//! Each call resolves exactly once and callers await it before issuing the
//! next, so no request ever overlaps another.

use async_trait::async_trait;
use mastermind_core::{ApiError, Feedback, Guess, HttpMethod, HttpRequest, HttpResponse, MastermindClient};
use tracing::{debug, instrument};

use crate::config::Config;

/// The three operations the game service offers.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Start a game and return its identifier.
    async fn create_game(&self) -> Result<String, ApiError>;

    /// Score `guess` against the game's secret code.
    async fn submit_guess(&self, game_id: &str, guess: &Guess) -> Result<Feedback, ApiError>;

    /// Tear the game down. Only transport failures are reported.
    async fn delete_game(&self, game_id: &str) -> Result<(), ApiError>;
}

/// `GameApi` over real HTTP.
#[derive(Debug, Clone)]
pub struct HttpGameApi {
    client: MastermindClient,
    http: reqwest::Client,
}

impl HttpGameApi {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: MastermindClient::new(&config.base_url),
            http: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match req.method {
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        debug!(method = %req.method, path = %req.path, "sending request");

        let mut builder = self.http.request(method, &req.path);
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(transport_error)?;
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse { status, headers, body })
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

#[async_trait]
impl GameApi for HttpGameApi {
    #[instrument(skip(self))]
    async fn create_game(&self) -> Result<String, ApiError> {
        let response = self.execute(self.client.build_create_game()).await?;
        self.client.parse_create_game(response)
    }

    #[instrument(skip(self, guess), fields(guess = %guess))]
    async fn submit_guess(&self, game_id: &str, guess: &Guess) -> Result<Feedback, ApiError> {
        let req = self.client.build_submit_guess(game_id, guess)?;
        let response = self.execute(req).await?;
        self.client.parse_submit_guess(response)
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, game_id: &str) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete_game(game_id)).await?;
        self.client.parse_delete_game(response)
    }
}
