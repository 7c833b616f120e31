//! Mock ReviewService implementation for testing

use crate::error::{ClientError, ClientResult};
use crate::game::GameRecord;
use crate::traits::{QueueResponse, ReviewRequest, ReviewService};
use async_trait::async_trait;
use review::Review;
use std::sync::{Arc, Mutex};

type Responder<T> = Box<dyn Fn() -> ClientResult<T> + Send>;

/// Mock service for testing - only compiled in test mode or with mock feature.
///
/// Clones share responses and the call log, so a test can keep a handle
/// while the code under test owns another.
#[cfg(any(test, feature = "mock"))]
#[derive(Clone)]
pub struct MockReviewService {
    responses: Arc<Mutex<MockResponses>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[cfg(any(test, feature = "mock"))]
#[derive(Default)]
struct MockResponses {
    list_reviews: Option<Responder<Vec<Review>>>,
    get_review: Option<Box<dyn Fn(&str) -> ClientResult<Review> + Send>>,
    request_review: Option<Responder<QueueResponse>>,
    get_game: Option<Responder<GameRecord>>,
}

#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    ListReviews { game_id: u64 },
    GetReview { game_id: u64, review_id: String },
    RequestReview { game_id: u64, request: ReviewRequest },
    GetGame { game_id: u64 },
}

#[cfg(any(test, feature = "mock"))]
impl Default for MockReviewService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "mock"))]
impl MockReviewService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(MockResponses::default())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure list_reviews response
    pub fn with_list_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<Vec<Review>> + Send + 'static,
    {
        self.responses.lock().unwrap().list_reviews = Some(Box::new(f));
        self
    }

    /// Configure get_review response, keyed by the requested review id
    pub fn with_review_response<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> ClientResult<Review> + Send + 'static,
    {
        self.responses.lock().unwrap().get_review = Some(Box::new(f));
        self
    }

    /// Configure request_review response
    pub fn with_queue_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<QueueResponse> + Send + 'static,
    {
        self.responses.lock().unwrap().request_review = Some(Box::new(f));
        self
    }

    /// Configure get_game response
    pub fn with_game_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<GameRecord> + Send + 'static,
    {
        self.responses.lock().unwrap().get_game = Some(Box::new(f));
        self
    }

    /// Serve `reviews`: the list returns summaries without move data, and
    /// get_review returns the full review with the requested id.
    pub fn with_reviews(self, reviews: Vec<Review>) -> Self {
        self.set_reviews(reviews);
        self
    }

    /// Replace the served reviews, e.g. before simulating a push.
    pub fn set_reviews(&self, reviews: Vec<Review>) {
        let summaries: Vec<Review> = reviews
            .iter()
            .map(|r| Review {
                moves: Default::default(),
                ..r.clone()
            })
            .collect();
        let mut responses = self.responses.lock().unwrap();
        responses.list_reviews = Some(Box::new(move || Ok(summaries.clone())));
        responses.get_review = Some(Box::new(move |id: &str| {
            reviews
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| ClientError::Status {
                    status: 404,
                    url: format!("mock://ai_review/{id}"),
                })
        }));
    }

    /// Get recorded calls for verification
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear call history
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    fn record(&self, call: MockCall) {
        self.call_log.lock().unwrap().push(call);
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl ReviewService for MockReviewService {
    async fn list_reviews(&self, game_id: u64) -> ClientResult<Vec<Review>> {
        self.record(MockCall::ListReviews { game_id });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.list_reviews {
            f()
        } else {
            Err(ClientError::NotConfigured("list_reviews".to_string()))
        }
    }

    async fn get_review(&self, game_id: u64, review_id: &str) -> ClientResult<Review> {
        self.record(MockCall::GetReview {
            game_id,
            review_id: review_id.to_string(),
        });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_review {
            f(review_id)
        } else {
            Err(ClientError::NotConfigured("get_review".to_string()))
        }
    }

    async fn request_review(
        &self,
        game_id: u64,
        request: &ReviewRequest,
    ) -> ClientResult<QueueResponse> {
        self.record(MockCall::RequestReview {
            game_id,
            request: request.clone(),
        });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.request_review {
            f()
        } else {
            Err(ClientError::NotConfigured("request_review".to_string()))
        }
    }

    async fn get_game(&self, game_id: u64) -> ClientResult<GameRecord> {
        self.record(MockCall::GetGame { game_id });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_game {
            f()
        } else {
            Err(ClientError::NotConfigured("get_game".to_string()))
        }
    }
}
