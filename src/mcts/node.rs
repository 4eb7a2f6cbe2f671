use std::ops::Index;

use crate::{Board, Move, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/*====================================================================================================================*/

#[derive(Debug, Clone)]
pub struct Node {
    board: Board,

    // the side that moved into this node and the side to move in it
    player: Player,
    enemy: Player,

    wins: f64,
    playouts: u32,

    // None only for the root
    move_taken: Option<Move>,

    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn enemy(&self) -> Player {
        self.enemy
    }

    pub fn wins(&self) -> f64 {
        self.wins
    }

    pub fn playouts(&self) -> u32 {
        self.playouts
    }

    pub fn move_taken(&self) -> Option<&Move> {
        self.move_taken.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn win_rate(&self) -> f64 {
        if self.playouts == 0 {
            0.0
        } else {
            self.wins / self.playouts as f64
        }
    }

    pub(crate) fn add_win(&mut self) {
        self.wins += 1.0;
    }

    pub(crate) fn add_draw(&mut self) {
        self.wins += 0.5;
    }

    pub(crate) fn add_playout(&mut self) {
        self.playouts += 1;
    }
}

/*====================================================================================================================*/

/// Nodes of one search, stored in creation order. Children and parents are referenced by `NodeId`; nothing is
/// ever removed, the whole tree is dropped once the move is chosen.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    /// tree holding only the root: `to_move` is about to move on `board`
    pub fn new(board: Board, to_move: Player) -> Self {
        SearchTree {
            nodes: vec![Node {
                board,
                player: !to_move,
                enemy: to_move,
                wins: 0.0,
                playouts: 0,
                move_taken: None,
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes[id.0].children.iter().map(move |&child| (child, &self.nodes[child.0]))
    }

    /// Appends one child per move, each on its own copy of the parent's board, with the sides swapped.
    pub fn expand(&mut self, id: NodeId, moves: &[Move]) {
        let mut children = Vec::with_capacity(moves.len());

        for move_ in moves.iter() {
            let parent = &self.nodes[id.0];

            let mut board = parent.board.clone();
            board.apply_move(move_);

            let child = Node {
                board,
                player: parent.enemy,
                enemy: parent.player,
                wins: 0.0,
                playouts: 0,
                move_taken: Some(move_.clone()),
                children: Vec::new(),
                parent: Some(id),
            };

            children.push(NodeId(self.nodes.len()));
            self.nodes.push(child);
        }

        self.nodes[id.0].children.extend(children);
    }

    /// `id` followed by its ancestors up to the root
    pub fn path_to_root(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&node| self.nodes[node.0].parent)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

impl Index<NodeId> for SearchTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

/*====================================================================================================================*/
