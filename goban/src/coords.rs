//! Two-letter move strings and human-readable coordinates.
//!
//! A move is encoded as one character per axis: `a` is 0, `b` is 1 and
//! so on; `.` stands for the pass coordinate `-1`. A move string is the
//! concatenation of encoded moves.

use crate::error::GobanError;
use crate::types::Intersection;

/// Column letters used by [`pretty_coords`]. `I` is skipped by convention.
const COLUMN_LETTERS: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";

fn encode_axis(n: i32) -> char {
    match u8::try_from(n) {
        Ok(n) if n < 26 => (b'a' + n) as char,
        _ => '.',
    }
}

fn decode_axis(c: char) -> Result<i32, GobanError> {
    match c {
        '.' => Ok(-1),
        'a'..='z' => Ok(c as i32 - 'a' as i32),
        _ => Err(GobanError::InvalidCoordinate(c)),
    }
}

pub fn encode_move(at: Intersection) -> String {
    if at.is_pass() {
        return "..".to_string();
    }
    let mut s = String::with_capacity(2);
    s.push(encode_axis(at.x));
    s.push(encode_axis(at.y));
    s
}

pub fn encode_moves(moves: &[Intersection]) -> String {
    moves.iter().map(|m| encode_move(*m)).collect()
}

/// Decode a move string produced by [`encode_moves`].
pub fn decode_moves(encoded: &str) -> Result<Vec<Intersection>, GobanError> {
    let chars: Vec<char> = encoded.chars().collect();
    if chars.len() % 2 != 0 {
        return Err(GobanError::OddMoveString(chars.len()));
    }

    chars
        .chunks(2)
        .map(|pair| {
            let x = decode_axis(pair[0])?;
            let y = decode_axis(pair[1])?;
            if x < 0 || y < 0 {
                Ok(Intersection::PASS)
            } else {
                Ok(Intersection::new(x, y))
            }
        })
        .collect()
}

/// Display coordinates such as `D4`, counting rows from the bottom edge.
pub fn pretty_coords(at: Intersection, height: u8) -> String {
    if at.is_pass() {
        return "pass".to_string();
    }
    let column = COLUMN_LETTERS
        .chars()
        .nth(at.x as usize)
        .unwrap_or('?');
    format!("{}{}", column, height as i32 - at.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_corner_and_pass() {
        assert_eq!(encode_move(Intersection::new(0, 0)), "aa");
        assert_eq!(encode_move(Intersection::new(15, 3)), "pd");
        assert_eq!(encode_move(Intersection::PASS), "..");
    }

    #[test]
    fn encode_moves_concatenates() {
        let moves = [Intersection::new(3, 3), Intersection::new(15, 15)];
        assert_eq!(encode_moves(&moves), "ddpp");
        assert_eq!(encode_moves(&[]), "");
    }

    #[test]
    fn decode_rejects_odd_length() {
        assert_eq!(decode_moves("abc"), Err(GobanError::OddMoveString(3)));
    }

    #[test]
    fn decode_rejects_unknown_characters() {
        assert_eq!(decode_moves("aZ"), Err(GobanError::InvalidCoordinate('Z')));
    }

    #[test]
    fn decode_reads_passes() {
        assert_eq!(
            decode_moves("..cd").unwrap(),
            vec![Intersection::PASS, Intersection::new(2, 3)]
        );
    }

    #[test]
    fn pretty_coords_skip_i_and_count_from_bottom() {
        assert_eq!(pretty_coords(Intersection::new(3, 15), 19), "D4");
        assert_eq!(pretty_coords(Intersection::new(8, 0), 19), "J19");
        assert_eq!(pretty_coords(Intersection::PASS, 19), "pass");
    }

    proptest! {
        #[test]
        fn decoding_recovers_encoded_moves(
            coords in proptest::collection::vec((0i32..19, 0i32..19), 0..40)
        ) {
            let moves: Vec<Intersection> =
                coords.into_iter().map(|(x, y)| Intersection::new(x, y)).collect();
            prop_assert_eq!(decode_moves(&encode_moves(&moves)).unwrap(), moves);
        }
    }
}
