//! Simple replication strategy.
//!
//! Places N replicas on the owner and its successors, clockwise.
//!
//! # Algorithm
//!
//! 1. Find the owner's position in the successor order
//! 2. Walk forward, wrapping, collecting distinct nodes
//! 3. Stop after N nodes (owner first)
//!
//! # Performance
//!
//! - **Time**: O(n + k) for k nodes in the order
//! - **Space**: O(n)

use std::collections::HashSet;

use corelib::NodeId;

use crate::error::{ReplicationError, Result};
use crate::strategy::ReplicationStrategy;

/// The standard "N ring successors" replica placement rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleStrategy;

impl SimpleStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ReplicationStrategy for SimpleStrategy {
    fn replicas(&self, order: &[NodeId], owner: NodeId, n: usize) -> Result<Vec<NodeId>> {
        if n > order.len() {
            return Err(ReplicationError::InsufficientNodes {
                want: n,
                have: order.len(),
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let start = order
            .iter()
            .position(|id| *id == owner)
            .ok_or(ReplicationError::UnknownOwner(owner))?;

        let mut replicas = Vec::with_capacity(n);
        let mut seen = HashSet::with_capacity(n);
        for step in 0..order.len() {
            let node_id = order[(start + step) % order.len()];
            if seen.insert(node_id) {
                replicas.push(node_id);
                if replicas.len() == n {
                    break;
                }
            }
        }

        Ok(replicas)
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Vec<NodeId> {
        vec![NodeId(4), NodeId(1), NodeId(3), NodeId(2)]
    }

    #[test]
    fn test_owner_first_then_successors() {
        let replicas = SimpleStrategy.replicas(&order(), NodeId(3), 3).unwrap();
        assert_eq!(replicas, vec![NodeId(3), NodeId(2), NodeId(4)]);
    }

    #[test]
    fn test_all_nodes_distinct() {
        let replicas = SimpleStrategy.replicas(&order(), NodeId(1), 4).unwrap();
        let unique: HashSet<_> = replicas.iter().collect();
        assert_eq!(unique.len(), 4);
        assert_eq!(replicas[0], NodeId(1));
    }

    #[test]
    fn test_insufficient_nodes() {
        let err = SimpleStrategy.replicas(&order(), NodeId(1), 5).unwrap_err();
        assert_eq!(err, ReplicationError::InsufficientNodes { want: 5, have: 4 });
    }

    #[test]
    fn test_unknown_owner() {
        let err = SimpleStrategy.replicas(&order(), NodeId(9), 2).unwrap_err();
        assert_eq!(err, ReplicationError::UnknownOwner(NodeId(9)));
    }

    #[test]
    fn test_zero_replicas() {
        assert!(SimpleStrategy.replicas(&order(), NodeId(1), 0).unwrap().is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(SimpleStrategy::new().name(), "SimpleStrategy");
    }
}
