//! Review data as served by the review API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use goban::Intersection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewType {
    Fast,
    Full,
    #[default]
    Auto,
}

impl ReviewType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Full => "full",
            Self::Auto => "auto",
        }
    }
}

impl std::fmt::Display for ReviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One AI analysis pass over a game.
///
/// List endpoints return summaries with an empty `moves` mapping; the
/// full review carries one [`MoveAnalysis`] per analyzed move.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub engine_version: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub network_size: u32,
    #[serde(rename = "type", default)]
    pub review_type: ReviewType,
    #[serde(default)]
    pub strength: u32,
    #[serde(with = "chrono::serde::ts_milliseconds", default)]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub moves: BTreeMap<u32, MoveAnalysis>,
}

fn pass() -> Intersection {
    Intersection::PASS
}

/// Engine evaluation of one move of the game record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveAnalysis {
    pub move_number: u32,
    #[serde(rename = "move", default = "pass")]
    pub played: Intersection,
    pub pre_move_win_rate: f64,
    /// Filled in by reconciliation from the next analyzed move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_move_win_rate: Option<f64>,
    #[serde(default)]
    pub variations: Vec<Variation>,
    #[serde(default)]
    pub visits: u32,
}

/// Candidate move the engine considered.
///
/// `followup_moves` starts with the candidate itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    #[serde(rename = "move")]
    pub mv: Intersection,
    pub post_move_win_rate: f64,
    #[serde(default)]
    pub visits: u32,
    #[serde(default)]
    pub followup_moves: Vec<Intersection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_deserializes_without_moves() {
        let json = r#"{
            "id": "r1",
            "engine": "katago",
            "type": "full",
            "network_size": 40,
            "strength": 800,
            "date": 1600000000000
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.review_type, ReviewType::Full);
        assert_eq!(review.date.timestamp_millis(), 1_600_000_000_000);
        assert!(review.moves.is_empty());
    }

    #[test]
    fn move_keys_parse_as_numbers() {
        let json = r#"{
            "id": "r1",
            "type": "fast",
            "date": 0,
            "moves": {
                "3": {
                    "move_number": 3,
                    "move": {"x": 2, "y": 3},
                    "pre_move_win_rate": 0.42,
                    "variations": [
                        {"move": {"x": 15, "y": 3}, "post_move_win_rate": 0.45, "visits": 120,
                         "followup_moves": [{"x": 15, "y": 3}, {"x": 16, "y": 5}]}
                    ]
                }
            }
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        let analysis = &review.moves[&3];
        assert_eq!(analysis.played, Intersection::new(2, 3));
        assert_eq!(analysis.post_move_win_rate, None);
        assert_eq!(analysis.variations[0].followup_moves.len(), 2);
    }

    #[test]
    fn missing_played_move_defaults_to_pass() {
        let json = r#"{"move_number": 0, "pre_move_win_rate": 0.5}"#;
        let analysis: MoveAnalysis = serde_json::from_str(json).unwrap();
        assert!(analysis.played.is_pass());
        assert!(analysis.variations.is_empty());
    }
}
