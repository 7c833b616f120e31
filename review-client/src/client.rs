//! HTTP implementation of [`ReviewService`]

use std::time::Duration;

use async_trait::async_trait;
use review::Review;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::game::GameRecord;
use crate::traits::{QueueResponse, ReviewRequest, ReviewService};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Network client for the review API
pub struct HttpReviewClient {
    host: Url,
    api_prefix: String,
    token: Option<SecretString>,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpReviewClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReviewClient")
            .field("host", &self.host.as_str())
            .field("api_prefix", &self.api_prefix)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpReviewClient {
    /// Create a client for `host` (e.g. `https://online-go.com`) whose REST
    /// endpoints live under `api_prefix` (e.g. `/api/v1`).
    pub fn new(host: &str, api_prefix: &str) -> ClientResult<Self> {
        Self::with_timeout(host, api_prefix, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(host: &str, api_prefix: &str, timeout: Duration) -> ClientResult<Self> {
        let host = Url::parse(host).map_err(|e| ClientError::InvalidAddress(e.to_string()))?;
        if host.cannot_be_a_base() {
            return Err(ClientError::InvalidAddress(host.to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            host,
            api_prefix: normalize_prefix(api_prefix),
            token: None,
            client,
        })
    }

    /// Authenticate requests with a bearer token. Queueing reviews requires it.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    fn api_url(&self, path: &str) -> ClientResult<Url> {
        self.join(&format!("{}{}", self.api_prefix, path))
    }

    fn join(&self, path: &str) -> ClientResult<Url> {
        self.host
            .join(path)
            .map_err(|e| ClientError::InvalidAddress(e.to_string()))
    }

    pub(crate) fn reviews_url(&self, game_id: u64) -> ClientResult<Url> {
        self.api_url(&format!("/games/{game_id}/ai_reviews"))
    }

    pub(crate) fn review_url(&self, game_id: u64, review_id: &str) -> ClientResult<Url> {
        self.join(&format!(
            "/termination-api/game/{game_id}/ai_review/{review_id}"
        ))
    }

    pub(crate) fn game_url(&self, game_id: u64) -> ClientResult<Url> {
        self.api_url(&format!("/games/{game_id}"))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[async_trait]
impl ReviewService for HttpReviewClient {
    #[instrument(skip(self))]
    async fn list_reviews(&self, game_id: u64) -> ClientResult<Vec<Review>> {
        let url = self.reviews_url(game_id)?;
        debug!(%url, "listing reviews");
        self.send(self.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn get_review(&self, game_id: u64, review_id: &str) -> ClientResult<Review> {
        let url = self.review_url(game_id, review_id)?;
        debug!(%url, "fetching review");
        let review: Review = self.send(self.client.get(url)).await?;
        if review.id != review_id {
            return Err(ClientError::InvalidData(format!(
                "asked for review {review_id}, got {}",
                review.id
            )));
        }
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn request_review(
        &self,
        game_id: u64,
        request: &ReviewRequest,
    ) -> ClientResult<QueueResponse> {
        let url = self.reviews_url(game_id)?;
        debug!(%url, engine = %request.engine, kind = %request.review_type, "queueing review");
        self.send(self.client.post(url).json(request)).await
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: u64) -> ClientResult<GameRecord> {
        let url = self.game_url(game_id)?;
        self.send(self.client.get(url)).await
    }
}
