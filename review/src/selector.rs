//! Choosing which review to show when a game has several.

use std::cmp::Ordering;

use crate::types::{Review, ReviewType};

fn type_rank(review: &Review) -> u8 {
    match review.review_type {
        ReviewType::Full => 0,
        ReviewType::Fast | ReviewType::Auto => 1,
    }
}

/// Total order over reviews, best first.
///
/// Full reviews come first, then larger networks, then higher strength,
/// then older reviews. The identifier breaks any remaining tie so the
/// result never depends on input order.
pub fn compare_reviews(a: &Review, b: &Review) -> Ordering {
    type_rank(a)
        .cmp(&type_rank(b))
        .then_with(|| b.network_size.cmp(&a.network_size))
        .then_with(|| b.strength.cmp(&a.strength))
        .then_with(|| a.date.cmp(&b.date))
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| a.review_type.as_str().cmp(b.review_type.as_str()))
}

/// Sort reviews best first.
pub fn rank_reviews(reviews: &mut [Review]) {
    reviews.sort_by(compare_reviews);
}

/// The best review, or `None` when the game has no reviews yet.
pub fn select_best(reviews: &[Review]) -> Option<&Review> {
    reviews.iter().min_by(|a, b| compare_reviews(a, b))
}
