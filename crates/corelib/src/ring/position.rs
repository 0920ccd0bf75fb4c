//! Per-node ring positions.
//!
//! Placement keys give every node R points on the ring. Replica selection
//! instead walks a coarser view with exactly one position per node, derived
//! from the node address alone, so the successor order does not depend on
//! how many placement keys a node has.

use crate::node::NodeId;
use crate::token::Token;

/// A node's single position on the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePosition {
    pub token: Token,
    pub node_id: NodeId,
}

/// Sorted, de-duplicated per-node positions.
#[derive(Debug, Clone, Default)]
pub struct NodePositions {
    positions: Vec<NodePosition>,
}

impl NodePositions {
    pub fn insert(&mut self, token: Token, node_id: NodeId) {
        if self.positions.iter().any(|p| p.node_id == node_id) {
            return;
        }
        let position = NodePosition { token, node_id };
        // Ties on token are broken by node id, keeping the order total.
        let idx = self.positions.partition_point(|p| *p < position);
        self.positions.insert(idx, position);
    }

    pub fn remove(&mut self, node_id: NodeId) -> bool {
        let before = self.positions.len();
        self.positions.retain(|p| p.node_id != node_id);
        self.positions.len() != before
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Node ids in clockwise order starting from the smallest token.
    pub fn order(&self) -> Vec<NodeId> {
        self.positions.iter().map(|p| p.node_id).collect()
    }

    pub fn as_slice(&self) -> &[NodePosition] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_by_token() {
        let mut positions = NodePositions::default();
        positions.insert(Token(300), NodeId(1));
        positions.insert(Token(100), NodeId(2));
        positions.insert(Token(200), NodeId(3));

        assert_eq!(positions.order(), vec![NodeId(2), NodeId(3), NodeId(1)]);
    }

    #[test]
    fn test_one_position_per_node() {
        let mut positions = NodePositions::default();
        positions.insert(Token(100), NodeId(1));
        positions.insert(Token(50), NodeId(1));
        assert_eq!(positions.len(), 1);

        assert!(positions.remove(NodeId(1)));
        assert!(!positions.remove(NodeId(1)));
        assert!(positions.is_empty());
    }

    #[test]
    fn test_token_tie_broken_by_id() {
        let mut positions = NodePositions::default();
        positions.insert(Token(7), NodeId(9));
        positions.insert(Token(7), NodeId(4));
        assert_eq!(positions.order(), vec![NodeId(4), NodeId(9)]);
    }
}
