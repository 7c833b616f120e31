//! Game record as a tree of moves.
//!
//! The trunk is the game as it was played. Any node created by
//! [`MoveTree::play`] that does not extend the trunk belongs to a
//! variation the viewer is exploring.

use smallvec::SmallVec;

use crate::coords::encode_moves;
use crate::error::GobanError;
use crate::position::Position;
use crate::types::{BoardSize, Intersection, StoneColor};

/// Handle to a node. Only minted by the tree that owns the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    mv: Intersection,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 2]>,
    trunk: bool,
    move_number: u32,
}

#[derive(Debug, Clone)]
pub struct MoveTree {
    nodes: Vec<Node>,
    size: BoardSize,
    first_to_move: StoneColor,
    trunk_end: NodeId,
}

impl MoveTree {
    pub fn new(size: BoardSize, first_to_move: StoneColor) -> Self {
        let root = Node {
            mv: Intersection::PASS,
            parent: None,
            children: SmallVec::new(),
            trunk: true,
            move_number: 0,
        };
        Self {
            nodes: vec![root],
            size,
            first_to_move,
            trunk_end: NodeId(0),
        }
    }

    /// Build a tree whose trunk is the given game record.
    pub fn from_trunk(size: BoardSize, first_to_move: StoneColor, moves: &[Intersection]) -> Self {
        let mut tree = Self::new(size, first_to_move);
        for mv in moves {
            tree.push_trunk(*mv);
        }
        tree
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn trunk_end(&self) -> NodeId {
        self.trunk_end
    }

    /// Append a move to the end of the trunk.
    pub fn push_trunk(&mut self, mv: Intersection) -> NodeId {
        let parent = self.trunk_end;
        let id = self.insert(parent, mv, true);
        self.trunk_end = id;
        id
    }

    /// Play `mv` after `parent`, reusing an existing child with the same move.
    pub fn play(&mut self, parent: NodeId, mv: Intersection) -> NodeId {
        if let Some(existing) = self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].mv == mv)
        {
            return existing;
        }
        self.insert(parent, mv, false)
    }

    fn insert(&mut self, parent: NodeId, mv: Intersection, trunk: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        let move_number = self.nodes[parent.0].move_number + 1;
        self.nodes.push(Node {
            mv,
            parent: Some(parent),
            children: SmallVec::new(),
            trunk,
            move_number,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn check(&self, id: NodeId) -> Result<NodeId, GobanError> {
        if self.contains(id) {
            Ok(id)
        } else {
            Err(GobanError::UnknownNode(id.0))
        }
    }

    pub fn is_trunk(&self, id: NodeId) -> bool {
        self.nodes[id.0].trunk
    }

    pub fn move_number(&self, id: NodeId) -> u32 {
        self.nodes[id.0].move_number
    }

    /// The move that led to this node. The root holds a pass.
    pub fn mv(&self, id: NodeId) -> Intersection {
        self.nodes[id.0].mv
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Nearest trunk node at or above `id`.
    pub fn branch_point(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        while !self.nodes[cur.0].trunk {
            match self.nodes[cur.0].parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        cur
    }

    /// Next trunk node after a trunk node.
    pub fn trunk_next(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_trunk(id) {
            return None;
        }
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].trunk)
    }

    /// Trunk node with the given move number, clamped to the trunk end.
    pub fn trunk_node(&self, move_number: u32) -> NodeId {
        let mut cur = self.root();
        while self.move_number(cur) < move_number {
            match self.trunk_next(cur) {
                Some(next) => cur = next,
                None => break,
            }
        }
        cur
    }

    /// Preferred continuation: the trunk child if any, otherwise the first child.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.trunk_next(id)
            .or_else(|| self.children(id).first().copied())
    }

    /// Moves from the root to `id`, oldest first.
    pub fn path_to(&self, id: NodeId) -> Vec<Intersection> {
        let mut moves = Vec::with_capacity(self.move_number(id) as usize);
        let mut cur = id;
        while let Some(parent) = self.nodes[cur.0].parent {
            moves.push(self.nodes[cur.0].mv);
            cur = parent;
        }
        moves.reverse();
        moves
    }

    pub fn move_string_to(&self, id: NodeId) -> String {
        encode_moves(&self.path_to(id))
    }

    /// Number of steps from `ancestor` down to `id`.
    pub fn distance(&self, id: NodeId, ancestor: NodeId) -> u32 {
        self.move_number(id)
            .saturating_sub(self.move_number(ancestor))
    }

    pub fn color_to_move(&self, id: NodeId) -> StoneColor {
        if self.move_number(id) % 2 == 0 {
            self.first_to_move
        } else {
            self.first_to_move.opponent()
        }
    }

    /// Stones on the board after the moves leading to `id`.
    pub fn position_at(&self, id: NodeId) -> Result<Position, GobanError> {
        Position::replay(self.size, self.first_to_move, &self.path_to(id))
    }
}
