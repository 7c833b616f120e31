//! Game record as served by `GET {api}/games/{id}`.

use goban::{BoardSize, Intersection, MoveTree, StoneColor};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerInfo {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Players {
    #[serde(default)]
    pub black: PlayerInfo,
    #[serde(default)]
    pub white: PlayerInfo,
}

fn black() -> StoneColor {
    StoneColor::Black
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    /// Trunk moves; the wire form is `[[x, y, elapsed_ms], ...]`.
    #[serde(deserialize_with = "deserialize_moves", default)]
    pub moves: Vec<Intersection>,
    #[serde(default = "black")]
    pub initial_player: StoneColor,
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            moves: Vec::new(),
            initial_player: StoneColor::Black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: u64,
    pub width: u8,
    pub height: u8,
    #[serde(default)]
    pub players: Players,
    #[serde(default)]
    pub gamedata: GameData,
}

impl GameRecord {
    pub fn size(&self) -> BoardSize {
        BoardSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Build the move tree holding this game's trunk.
    pub fn move_tree(&self) -> MoveTree {
        MoveTree::from_trunk(self.size(), self.gamedata.initial_player, &self.gamedata.moves)
    }
}

fn deserialize_moves<'de, D>(deserializer: D) -> Result<Vec<Intersection>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Vec<f64>> = Vec::deserialize(deserializer)?;
    raw.into_iter()
        .map(|entry| match entry.as_slice() {
            [x, y, ..] => Ok(Intersection::new(*x as i32, *y as i32)),
            _ => Err(serde::de::Error::custom(format!(
                "move entry needs at least two coordinates, got {}",
                entry.len()
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: &str = r#"{
        "id": 12345,
        "width": 9,
        "height": 9,
        "players": {
            "black": {"username": "alice"},
            "white": {"username": "bob"}
        },
        "gamedata": {
            "moves": [[2, 2, 1530], [6, 6, 2010.5], [-1, -1, 800]],
            "initial_player": "black"
        }
    }"#;

    #[test]
    fn parses_game_record() {
        let game: GameRecord = serde_json::from_str(GAME).unwrap();
        assert_eq!(game.size(), BoardSize::square(9));
        assert_eq!(game.players.white.username, "bob");
        assert_eq!(
            game.gamedata.moves,
            vec![
                Intersection::new(2, 2),
                Intersection::new(6, 6),
                Intersection::PASS
            ]
        );
    }

    #[test]
    fn builds_trunk_tree() {
        let game: GameRecord = serde_json::from_str(GAME).unwrap();
        let tree = game.move_tree();
        let last = tree.trunk_end();
        assert_eq!(tree.move_number(last), 3);
        assert!(tree.is_trunk(last));
    }

    #[test]
    fn rejects_short_move_entries() {
        let json = r#"{"id": 1, "width": 19, "height": 19, "gamedata": {"moves": [[3]]}}"#;
        assert!(serde_json::from_str::<GameRecord>(json).is_err());
    }

    #[test]
    fn missing_gamedata_defaults_to_black_first() {
        let json = r#"{"id": 1, "width": 19, "height": 19}"#;
        let game: GameRecord = serde_json::from_str(json).unwrap();
        assert!(game.gamedata.moves.is_empty());
        assert_eq!(game.gamedata.initial_player, StoneColor::Black);
    }
}
