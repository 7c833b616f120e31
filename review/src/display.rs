//! Text helpers for presenting reviews.

use crate::types::{Review, ReviewType};

/// Strength badge shown next to a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthTier {
    Fast,
    Weak,
    One,
    Two,
    Three,
}

impl StrengthTier {
    pub fn of(review: &Review) -> Self {
        if review.review_type == ReviewType::Fast {
            return Self::Fast;
        }
        match review.strength {
            s if s >= 1600 => Self::Three,
            s if s >= 800 => Self::Two,
            s if s >= 300 => Self::One,
            _ => Self::Weak,
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Self::Three => "III",
            Self::Two => "II",
            Self::One => "I",
            Self::Fast | Self::Weak => "",
        }
    }
}

pub fn engine_display_name(engine: &str) -> &'static str {
    match engine {
        "leela_zero" => "Leela Zero",
        "katago" => "KataGo",
        _ => "AI",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaTrend {
    Positive,
    Negative,
    Neutral,
}

/// Win-rate change of the move just played, in percentage points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaDisplay {
    points: f64,
}

impl DeltaDisplay {
    /// Moves within this many points either way count as neutral.
    const NEUTRAL_BAND: f64 = 0.1;

    pub fn new(delta: f64) -> Self {
        Self {
            points: delta * 100.0,
        }
    }

    pub fn trend(&self) -> DeltaTrend {
        if self.points <= -Self::NEUTRAL_BAND {
            DeltaTrend::Negative
        } else if self.points >= Self::NEUTRAL_BAND {
            DeltaTrend::Positive
        } else {
            DeltaTrend::Neutral
        }
    }

    pub fn sign(&self) -> &'static str {
        match self.trend() {
            DeltaTrend::Negative => "\u{2212}",
            DeltaTrend::Positive => "+",
            DeltaTrend::Neutral => " ",
        }
    }
}

impl std::fmt::Display for DeltaDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:.1}pp", self.sign(), self.points.abs())
    }
}

/// Black/White split of a win-rate, in percent with one decimal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinRateSplit {
    pub black: f64,
    pub white: f64,
}

impl WinRateSplit {
    pub fn new(win_rate: f64) -> Self {
        let black = win_rate * 100.0;
        Self {
            black,
            white: 100.0 - black,
        }
    }

    pub fn labels(&self) -> (String, String) {
        (format!("{:.1}%", self.black), format!("{:.1}%", self.white))
    }
}
