//! Client library for the AI review API.
//!
//! Provides the [`ReviewService`] abstraction, an HTTP implementation and
//! the push-event model used to keep an open review up to date.
//!
//! # Example
//!
//! ```no_run
//! use review_client::{HttpReviewClient, ReviewService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpReviewClient::new("https://online-go.com", "/api/v1")?;
//!     let reviews = client.list_reviews(12345).await?;
//!     println!("{} reviews", reviews.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod game;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod push;
mod traits;

pub use client::HttpReviewClient;
pub use error::{ClientError, ClientResult};
pub use game::{GameData, GameRecord, PlayerInfo, Players};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockReviewService};
pub use push::{PushEvent, PushSender, PushStream};
pub use traits::{QueueResponse, ReviewRequest, ReviewService};

// Re-export review types for convenience
pub use review::{MoveAnalysis, Review, ReviewType, Variation};
