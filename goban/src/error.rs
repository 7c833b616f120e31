use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GobanError {
    #[error("Invalid move string: odd length {0}")]
    OddMoveString(usize),

    #[error("Invalid coordinate character: {0:?}")]
    InvalidCoordinate(char),

    #[error("Intersection ({x}, {y}) is outside a {width}x{height} board")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u8,
        height: u8,
    },

    #[error("Intersection ({x}, {y}) is already occupied")]
    Occupied { x: i32, y: i32 },

    #[error("Unknown move tree node: {0}")]
    UnknownNode(usize),
}
