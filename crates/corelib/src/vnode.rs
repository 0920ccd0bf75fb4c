//! Virtual node index and the bounded-load distributor.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! The key space is cut into a fixed number V of virtual node slots. A key is
//! routed by hashing it to a slot (`hash(key) % V`) and reading the slot's
//! owner, so a lookup is O(1) once the index exists.
//!
//! # Bounded Loads
//!
//! Each slot is hashed onto the ring and walks clockwise from its home
//! position until it meets a node holding fewer than
//! `cap = ceil(V / N * load_factor)` slots. Plain consistent hashing would
//! let a node's share grow without bound; the cap spills overflow onto
//! ring-adjacent nodes while keeping most slots where they were when the
//! node set changes.
//!
//! # Performance Characteristics
//!
//! - **Rebuild**: O(V log K) for K placement keys, plus the bounded walk
//! - **Lookup**: O(1)
//! - **Memory**: O(V)
//!
//! The index is rebuilt wholesale on every topology change, never patched.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::partitioner::Partitioner;
use crate::ring::HashRing;
use crate::token::Token;

/// One slot of the vnode index together with its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    pub slot: u64,
    pub node_id: NodeId,
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(slot={}, node={})", self.slot, self.node_id)
    }
}

/// Per-node capacity for `vnodes` slots spread over `nodes` nodes.
///
/// Uses real division: `ceil(vnodes / nodes * load_factor)`. Zero when there
/// are no nodes.
pub fn capacity(vnodes: usize, nodes: usize, load_factor: f64) -> usize {
    if nodes == 0 {
        return 0;
    }
    (vnodes as f64 / nodes as f64 * load_factor).ceil() as usize
}

/// Slot a token falls into for an index of `vnodes` slots.
#[inline]
pub fn slot_for(token: Token, vnodes: usize) -> usize {
    (token.0 % vnodes as u64) as usize
}

/// Total mapping from vnode slot to owning node, plus per-node load counts.
#[derive(Debug, Clone, Default)]
pub struct VNodeIndex {
    slots: Vec<Option<NodeId>>,
    loads: BTreeMap<NodeId, usize>,
    capacity: usize,
}

impl VNodeIndex {
    /// An index of `vnodes` unassigned slots.
    pub fn empty(vnodes: usize) -> Self {
        Self {
            slots: vec![None; vnodes],
            loads: BTreeMap::new(),
            capacity: 0,
        }
    }

    /// Assign every slot of a `vnodes`-sized index by walking `ring` under
    /// the load cap.
    ///
    /// # Errors
    ///
    /// [`Error::NoDistributionSlots`] if a slot completes a full wrap of the
    /// ring without finding a node under capacity. Nothing is returned in
    /// that case; the caller keeps whatever index it had.
    pub fn distribute(ring: &HashRing, vnodes: usize, load_factor: f64) -> Result<Self> {
        let nodes = ring.node_count();
        let cap = capacity(vnodes, nodes, load_factor);
        let partitioner = ring.partitioner();

        let mut slots = Vec::with_capacity(vnodes);
        let mut loads: BTreeMap<NodeId, usize> = BTreeMap::new();

        for slot in 0..vnodes {
            let token = partitioner.partition_u64(slot as u64);
            let Some(home) = ring.home_index(token) else {
                return Ok(Self::empty(vnodes));
            };
            let owner = ring
                .walk_from(home)
                .find(|id| loads.get(id).copied().unwrap_or(0) < cap)
                .ok_or(Error::NoDistributionSlots {
                    slot: slot as u64,
                    capacity: cap,
                    nodes,
                })?;
            *loads.entry(owner).or_insert(0) += 1;
            slots.push(Some(owner));
        }

        debug!(vnodes, nodes, capacity = cap, "distributed vnodes");
        Ok(Self {
            slots,
            loads,
            capacity: cap,
        })
    }

    /// Owner of a slot; `None` if out of range or unassigned.
    #[inline]
    pub fn owner(&self, slot: usize) -> Option<NodeId> {
        self.slots.get(slot).copied().flatten()
    }

    /// Owner of the slot `token` falls into.
    pub fn owner_of(&self, token: Token) -> Option<NodeId> {
        if self.slots.is_empty() {
            return None;
        }
        self.owner(slot_for(token, self.slots.len()))
    }

    /// Slot counts per node. Nodes without slots are absent.
    pub fn loads(&self) -> &BTreeMap<NodeId, usize> {
        &self.loads
    }

    pub fn load(&self, node_id: NodeId) -> usize {
        self.loads.get(&node_id).copied().unwrap_or(0)
    }

    /// Number of slots with an owner.
    pub fn assigned(&self) -> usize {
        self.loads.values().sum()
    }

    /// Per-node capacity in effect when the index was built.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once every slot has an owner.
    pub fn is_built(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(Option::is_some)
    }

    pub fn iter(&self) -> impl Iterator<Item = VirtualNode> + '_ {
        self.slots.iter().enumerate().filter_map(|(slot, owner)| {
            owner.map(|node_id| VirtualNode {
                slot: slot as u64,
                node_id,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::partitioner::PartitionerKind;

    fn ring_with(count: u32, keys: usize) -> HashRing {
        let mut ring = HashRing::new(PartitionerKind::Xxh3, keys);
        for i in 0..count {
            ring.add_node(&Node::new(NodeId(i), format!("host-{i}.com"), 1));
        }
        ring
    }

    #[test]
    fn test_capacity() {
        assert_eq!(capacity(256, 0, 1.25), 0);
        assert_eq!(capacity(256, 1, 1.25), 320);
        assert_eq!(capacity(256, 3, 1.0), 86);
        assert_eq!(capacity(3, 2, 1.25), 2);
    }

    #[test]
    fn test_empty_ring_gives_empty_index() {
        let ring = HashRing::default();
        let index = VNodeIndex::distribute(&ring, 16, 1.25).unwrap();
        assert_eq!(index.len(), 16);
        assert!(!index.is_built());
        assert_eq!(index.owner(0), None);
        assert_eq!(index.assigned(), 0);
    }

    #[test]
    fn test_single_node_owns_everything() {
        let ring = ring_with(1, 9);
        let index = VNodeIndex::distribute(&ring, 64, 1.25).unwrap();
        assert!(index.is_built());
        assert_eq!(index.load(NodeId(0)), 64);
        assert!(index.iter().all(|v| v.node_id == NodeId(0)));
    }

    #[test]
    fn test_loads_respect_capacity() {
        let ring = ring_with(7, 9);
        let index = VNodeIndex::distribute(&ring, 256, 1.25).unwrap();
        let cap = capacity(256, 7, 1.25);

        assert_eq!(index.capacity(), cap);
        assert_eq!(index.assigned(), 256);
        assert!(index.loads().values().all(|load| *load <= cap));
    }

    #[test]
    fn test_more_nodes_than_slots() {
        let ring = ring_with(40, 3);
        let index = VNodeIndex::distribute(&ring, 16, 1.25).unwrap();
        assert!(index.is_built());
        assert!(index.loads().values().all(|load| *load == 1));
    }

    #[test]
    fn test_low_load_factor_fails() {
        let ring = ring_with(4, 9);
        let err = VNodeIndex::distribute(&ring, 256, 0.5).unwrap_err();
        assert!(matches!(
            err,
            Error::NoDistributionSlots {
                capacity: 32,
                nodes: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_owner_of_matches_slot() {
        let ring = ring_with(3, 9);
        let index = VNodeIndex::distribute(&ring, 128, 1.25).unwrap();
        let token = Token(1_000_003);
        assert_eq!(index.owner_of(token), index.owner(slot_for(token, 128)));
    }
}
