#![allow(dead_code)]

use goban::Intersection;
use review::{MoveAnalysis, Review, ReviewType, Variation};
use review_client::{GameData, GameRecord, MockReviewService, PlayerInfo, Players};

/// 9x9 game: B C7, W G3, B C3.
pub fn game() -> GameRecord {
    GameRecord {
        id: 42,
        width: 9,
        height: 9,
        players: Players {
            black: PlayerInfo {
                username: "alice".into(),
            },
            white: PlayerInfo {
                username: "bob".into(),
            },
        },
        gamedata: GameData {
            moves: vec![
                Intersection::new(2, 2),
                Intersection::new(6, 6),
                Intersection::new(2, 6),
            ],
            ..Default::default()
        },
    }
}

pub fn analysis(move_number: u32, pre: f64) -> MoveAnalysis {
    MoveAnalysis {
        move_number,
        pre_move_win_rate: pre,
        ..Default::default()
    }
}

pub fn review(id: &str, review_type: ReviewType, strength: u32, network_size: u32) -> Review {
    Review {
        id: id.to_string(),
        engine: "leela_zero".into(),
        review_type,
        strength,
        network_size,
        ..Default::default()
    }
}

/// Full review with moves 0..=2 analyzed and a suggestion at move 1.
pub fn analyzed_review(id: &str, review_type: ReviewType) -> Review {
    let mut review = review(id, review_type, 1000, 40);
    review.moves.insert(0, analysis(0, 0.5));
    let mut second = analysis(1, 0.6);
    second.variations = vec![Variation {
        mv: Intersection::new(4, 4),
        post_move_win_rate: 0.55,
        visits: 500,
        followup_moves: vec![Intersection::new(4, 4), Intersection::new(5, 5)],
    }];
    review.moves.insert(1, second);
    review.moves.insert(2, analysis(2, 0.4));
    review
}

pub fn service_with(reviews: Vec<Review>) -> MockReviewService {
    MockReviewService::new()
        .with_game_response(|| Ok(game()))
        .with_reviews(reviews)
}
