//! Canonical intersection, color and board size types.

use serde::{Deserialize, Serialize};

use crate::error::GobanError;

/// A board intersection. `(-1, -1)` encodes a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Intersection {
    pub x: i32,
    pub y: i32,
}

impl Intersection {
    pub const PASS: Self = Self { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_pass(self) -> bool {
        self.x < 0 || self.y < 0
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Self::PASS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoneColor {
    Black,
    White,
}

impl StoneColor {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

impl std::fmt::Display for StoneColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Board dimensions. Go boards are not required to be square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: u8,
    pub height: u8,
}

impl BoardSize {
    pub const NINETEEN: Self = Self::square(19);

    pub const fn square(size: u8) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    pub fn contains(self, at: Intersection) -> bool {
        at.x >= 0 && at.y >= 0 && at.x < self.width as i32 && at.y < self.height as i32
    }

    /// Row-major index of an on-board intersection.
    pub fn index_of(self, at: Intersection) -> Result<usize, GobanError> {
        if !self.contains(at) {
            return Err(GobanError::OutOfBounds {
                x: at.x,
                y: at.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(at.y as usize * self.width as usize + at.x as usize)
    }

    pub fn cells(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::NINETEEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_is_recognised() {
        assert!(Intersection::PASS.is_pass());
        assert!(!Intersection::new(0, 0).is_pass());
    }

    #[test]
    fn default_intersection_is_a_pass() {
        assert_eq!(Intersection::default(), Intersection::PASS);
    }

    #[test]
    fn contains_respects_both_dimensions() {
        let size = BoardSize {
            width: 9,
            height: 13,
        };
        assert!(size.contains(Intersection::new(8, 12)));
        assert!(!size.contains(Intersection::new(9, 0)));
        assert!(!size.contains(Intersection::new(0, 13)));
        assert!(!size.contains(Intersection::PASS));
    }

    #[test]
    fn index_of_rejects_off_board() {
        let size = BoardSize::square(9);
        assert_eq!(size.index_of(Intersection::new(2, 1)), Ok(11));
        assert!(matches!(
            size.index_of(Intersection::new(9, 9)),
            Err(GobanError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn intersection_deserializes_from_object() {
        let at: Intersection = serde_json::from_str(r#"{"x": 3, "y": 15}"#).unwrap();
        assert_eq!(at, Intersection::new(3, 15));
    }
}
