//! Hash ring data structure.

use tracing::debug;

use crate::config::RingConfig;
use crate::node::{Node, NodeId};
use crate::partitioner::{Partitioner, PartitionerKind};
use crate::ring::position::NodePositions;
use crate::token::Token;

/// Sorted set of placement keys, each mapped to its owning node.
///
/// Every node contributes `replication_keys` keys, hashed from
/// `"{addr}:{index}"`. Keys are unique and kept in ascending order; a
/// colliding key stays with the node that inserted it first.
#[derive(Debug, Clone)]
pub struct HashRing {
    partitioner: PartitionerKind,
    replication_keys: usize,
    keys: Vec<(Token, NodeId)>,
    positions: NodePositions,
}

impl Default for HashRing {
    fn default() -> Self {
        Self::with_config(&RingConfig::default())
    }
}

impl HashRing {
    pub fn new(partitioner: PartitionerKind, replication_keys: usize) -> Self {
        Self {
            partitioner,
            replication_keys: replication_keys.max(1),
            keys: Vec::new(),
            positions: NodePositions::default(),
        }
    }

    pub fn with_config(config: &RingConfig) -> Self {
        Self::new(config.partitioner, config.replication_keys)
    }

    /// Placement key of replica slot `index` of the node at `addr`.
    pub fn placement_key(&self, addr: &str, index: usize) -> Token {
        self.partitioner.partition_str(&format!("{}:{}", addr, index))
    }

    /// Insert all placement keys of `node`. Returns the number of keys added.
    pub fn add_node(&mut self, node: &Node) -> usize {
        let mut added = 0;
        for i in 0..self.replication_keys {
            let token = self.placement_key(&node.addr, i);
            match self.keys.binary_search_by_key(&token, |(t, _)| *t) {
                Ok(idx) => {
                    let owner = self.keys[idx].1;
                    if owner != node.id {
                        debug!(addr = %node.addr, %token, %owner, "placement key collision, keeping first owner");
                    }
                }
                Err(idx) => {
                    self.keys.insert(idx, (token, node.id));
                    added += 1;
                }
            }
        }
        self.positions
            .insert(self.partitioner.partition_str(&node.addr), node.id);
        debug!(addr = %node.addr, id = %node.id, keys = added, "added node to ring");
        added
    }

    /// Drop every key owned by `node_id`. Returns the number of keys removed.
    pub fn remove_node(&mut self, node_id: NodeId) -> usize {
        let before = self.keys.len();
        self.keys.retain(|(_, owner)| *owner != node_id);
        self.positions.remove(node_id);
        let removed = before - self.keys.len();
        debug!(id = %node_id, keys = removed, "removed node from ring");
        removed
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.positions.clear();
    }

    /// Index of the smallest key >= `token`, wrapping to 0 past the end.
    ///
    /// `None` on an empty ring.
    pub fn home_index(&self, token: Token) -> Option<usize> {
        if self.keys.is_empty() {
            return None;
        }
        let idx = self.keys.partition_point(|(t, _)| *t < token);
        Some(if idx == self.keys.len() { 0 } else { idx })
    }

    /// Owners of the keys met walking clockwise from `start`, one full wrap.
    pub fn walk_from(&self, start: usize) -> impl Iterator<Item = NodeId> + '_ {
        let len = self.keys.len();
        (0..len).map(move |step| self.keys[(start + step) % len].1)
    }

    /// Plain consistent-hashing owner of `token`, without any load bound.
    pub fn lookup(&self, token: Token) -> Option<NodeId> {
        self.home_index(token).map(|idx| self.keys[idx].1)
    }

    /// All placement keys in ascending order.
    pub fn tokens(&self) -> &[(Token, NodeId)] {
        &self.keys
    }

    /// Node ids in per-node position order, used for replica selection.
    pub fn successor_order(&self) -> Vec<NodeId> {
        self.positions.order()
    }

    pub fn positions(&self) -> &NodePositions {
        &self.positions
    }

    pub fn partitioner(&self) -> PartitionerKind {
        self.partitioner
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    pub fn replication_keys(&self) -> usize {
        self.replication_keys
    }

    pub fn token_count(&self) -> usize {
        self.keys.len()
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u32, addr: &str) -> Node {
        Node::new(NodeId(id), addr, 1)
    }

    #[test]
    fn test_home_index_wraps() {
        let mut ring = HashRing::new(PartitionerKind::Xxh3, 4);
        ring.add_node(&node(1, "a"));

        let last = ring.tokens().last().unwrap().0;
        if last != Token::MAX {
            assert_eq!(ring.home_index(Token(last.0 + 1)), Some(0));
        }
        assert_eq!(ring.home_index(Token::MIN), Some(0));
        assert_eq!(ring.home_index(last), Some(ring.token_count() - 1));
    }

    #[test]
    fn test_walk_visits_every_key_once() {
        let mut ring = HashRing::new(PartitionerKind::Xxh3, 3);
        ring.add_node(&node(1, "a"));
        ring.add_node(&node(2, "b"));

        let walked: Vec<NodeId> = ring.walk_from(4).collect();
        assert_eq!(walked.len(), 6);
        assert_eq!(walked.iter().filter(|id| **id == NodeId(1)).count(), 3);
        assert_eq!(walked[0], ring.tokens()[4].1);
        assert_eq!(walked[2], ring.tokens()[0].1);
    }

    #[test]
    fn test_keys_sorted_and_unique() {
        let mut ring = HashRing::new(PartitionerKind::Sip, 9);
        for i in 0..20 {
            ring.add_node(&node(i, &format!("10.0.0.{i}")));
        }
        let tokens = ring.tokens();
        assert!(tokens.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut ring = HashRing::new(PartitionerKind::Xxh3, 4);
        assert_eq!(ring.add_node(&node(1, "a")), 4);
        assert_eq!(ring.add_node(&node(1, "a")), 0);
        assert_eq!(ring.token_count(), 4);
        assert_eq!(ring.node_count(), 1);
    }
}
