//! ReviewService trait abstraction for client implementations

use async_trait::async_trait;
use review::{Review, ReviewType};
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
use crate::game::GameRecord;

/// Body of a "queue a review" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub engine: String,
    #[serde(rename = "type")]
    pub review_type: ReviewType,
}

/// Response to a queue request. An identifier means the review was accepted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueueResponse {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

impl QueueResponse {
    pub fn is_queued(&self) -> bool {
        matches!(&self.id, Some(id) if !id.is_null())
    }
}

/// Review API interface.
/// Implemented by both HttpReviewClient and MockReviewService
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Review summaries for a game (no move data)
    async fn list_reviews(&self, game_id: u64) -> ClientResult<Vec<Review>>;

    /// A full review including its move mapping
    async fn get_review(&self, game_id: u64, review_id: &str) -> ClientResult<Review>;

    /// Queue a new review for a game
    async fn request_review(
        &self,
        game_id: u64,
        request: &ReviewRequest,
    ) -> ClientResult<QueueResponse>;

    /// The game record the reviews refer to
    async fn get_game(&self, game_id: u64) -> ClientResult<GameRecord>;
}
