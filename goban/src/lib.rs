//! Go board primitives shared by the review library and the terminal client.

pub mod coords;
pub mod error;
pub mod move_tree;
pub mod position;
pub mod types;

pub use coords::{decode_moves, encode_move, encode_moves, pretty_coords};
pub use error::GobanError;
pub use move_tree::{MoveTree, NodeId};
pub use position::Position;
pub use types::{BoardSize, Intersection, StoneColor};
