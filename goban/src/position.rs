//! Stone placement with capture resolution, used to draw the board.

use std::collections::HashSet;

use crate::error::GobanError;
use crate::types::{BoardSize, Intersection, StoneColor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    size: BoardSize,
    stones: Vec<Option<StoneColor>>,
}

impl Position {
    pub fn empty(size: BoardSize) -> Self {
        Self {
            size,
            stones: vec![None; size.cells()],
        }
    }

    /// Replay alternating moves starting with `first`. Passes only switch sides.
    pub fn replay(
        size: BoardSize,
        first: StoneColor,
        moves: &[Intersection],
    ) -> Result<Self, GobanError> {
        let mut position = Self::empty(size);
        let mut color = first;
        for mv in moves {
            if !mv.is_pass() {
                position.play(color, *mv)?;
            }
            color = color.opponent();
        }
        Ok(position)
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn stone_at(&self, at: Intersection) -> Option<StoneColor> {
        let idx = self.size.index_of(at).ok()?;
        self.stones[idx]
    }

    /// Place a stone and remove any groups left without liberties.
    /// Returns the captured intersections.
    pub fn play(
        &mut self,
        color: StoneColor,
        at: Intersection,
    ) -> Result<Vec<Intersection>, GobanError> {
        let idx = self.size.index_of(at)?;
        self.stones[idx] = Some(color);

        let mut captured = Vec::new();
        for neighbor in self.neighbors(at) {
            if self.stone_at(neighbor) == Some(color.opponent()) {
                let group = self.group(neighbor);
                if self.liberties(&group) == 0 {
                    captured.extend(group);
                }
            }
        }
        for stone in &captured {
            self.remove(*stone);
        }

        // Suicide removes the mover's own group.
        let own = self.group(at);
        if self.liberties(&own) == 0 {
            for stone in &own {
                self.remove(*stone);
            }
            captured.extend(own);
        }

        Ok(captured)
    }

    fn remove(&mut self, at: Intersection) {
        if let Ok(idx) = self.size.index_of(at) {
            self.stones[idx] = None;
        }
    }

    fn neighbors(&self, at: Intersection) -> Vec<Intersection> {
        [(0, -1), (0, 1), (-1, 0), (1, 0)]
            .iter()
            .map(|(dx, dy)| Intersection::new(at.x + dx, at.y + dy))
            .filter(|n| self.size.contains(*n))
            .collect()
    }

    fn group(&self, start: Intersection) -> Vec<Intersection> {
        let Some(color) = self.stone_at(start) else {
            return Vec::new();
        };
        let mut seen = HashSet::from([start]);
        let mut stack = vec![start];
        let mut group = Vec::new();
        while let Some(cur) = stack.pop() {
            group.push(cur);
            for n in self.neighbors(cur) {
                if self.stone_at(n) == Some(color) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        group
    }

    fn liberties(&self, group: &[Intersection]) -> usize {
        let mut libs = HashSet::new();
        for stone in group {
            for n in self.neighbors(*stone) {
                if self.stone_at(n).is_none() {
                    libs.insert(n);
                }
            }
        }
        libs.len()
    }
}
