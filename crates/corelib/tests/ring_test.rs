//! Tests for the hash ring and the bounded-load distributor.
//!
//! # Test Strategy
//!
//! 1. **Basic functionality**: Empty ring, add/lookup, remove
//! 2. **Multiple nodes**: Distribution, consistency
//! 3. **Bounded loads**: Capacity, churn on topology change
//! 4. **Properties**: Random node sets and configurations (proptest)

use corelib::node::{NodeId, NodeRegistry};
use corelib::ring::HashRing;
use corelib::vnode::{capacity, VNodeIndex};
use corelib::{Error, Partitioner, PartitionerKind, Token};
use proptest::prelude::*;

fn build(registry: &NodeRegistry, keys: usize) -> HashRing {
    let mut ring = HashRing::new(PartitionerKind::Xxh3, keys);
    for node in registry.iter() {
        ring.add_node(node);
    }
    ring
}

fn registry_of(count: usize) -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    for i in 0..count {
        registry.insert(&format!("127.0.0.{i}"), 1);
    }
    registry
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_ring_lookup() {
    let ring = HashRing::default();
    assert_eq!(ring.lookup(Token(42)), None);
    assert_eq!(ring.node_count(), 0);
    assert_eq!(ring.token_count(), 0);
    assert!(ring.is_empty());
}

#[test]
fn test_add_node_and_lookup() {
    let registry = registry_of(1);
    let ring = build(&registry, 4);

    assert_eq!(ring.node_count(), 1);
    assert_eq!(ring.token_count(), 4);
    assert_eq!(ring.lookup(Token(12345)), Some(NodeId(0)));
}

#[test]
fn test_remove_node() {
    let registry = registry_of(2);
    let mut ring = build(&registry, 4);
    assert_eq!(ring.token_count(), 8);

    assert_eq!(ring.remove_node(NodeId(0)), 4);
    assert_eq!(ring.node_count(), 1);
    assert_eq!(ring.token_count(), 4);
    assert_eq!(ring.lookup(Token(7)), Some(NodeId(1)));

    // Removing an unknown node removes nothing.
    assert_eq!(ring.remove_node(NodeId(999)), 0);
}

#[test]
fn test_add_remove_add() {
    let mut registry = NodeRegistry::new();
    let mut ring = HashRing::default();

    let id = registry.insert("node1", 1).unwrap();
    ring.add_node(registry.get(id).unwrap());
    assert_eq!(ring.node_count(), 1);

    let node = registry.remove("node1").unwrap();
    ring.remove_node(node.id);
    assert!(ring.is_empty());

    let id = registry.insert("node1", 1).unwrap();
    ring.add_node(registry.get(id).unwrap());
    assert_eq!(ring.lookup(Token(1)), Some(id));
}

#[test]
fn test_placement_keys_follow_address() {
    let ring = HashRing::new(PartitionerKind::Xxh3, 9);
    let expected = PartitionerKind::Xxh3.partition_str("10.1.1.1:3");
    assert_eq!(ring.placement_key("10.1.1.1", 3), expected);
}

#[test]
fn test_partitioner_name() {
    let ring = HashRing::default();
    assert_eq!(ring.partitioner_name(), "Xxh3Partitioner");
}

// ============================================================================
// Multiple Nodes Tests
// ============================================================================

#[test]
fn test_consistent_distribution() {
    let registry = registry_of(5);
    let ring = build(&registry, 9);

    let first = VNodeIndex::distribute(&ring, 256, 1.25).unwrap();
    let second = VNodeIndex::distribute(&ring, 256, 1.25).unwrap();
    let a: Vec<_> = first.iter().collect();
    let b: Vec<_> = second.iter().collect();
    assert_eq!(a, b, "same ring must produce the same index");
}

#[test]
fn test_insertion_order_does_not_matter() {
    let mut forward = HashRing::default();
    let mut backward = HashRing::default();
    let registry = registry_of(6);
    let nodes: Vec<_> = registry.iter().cloned().collect();

    for node in &nodes {
        forward.add_node(node);
    }
    for node in nodes.iter().rev() {
        backward.add_node(node);
    }

    assert_eq!(forward.tokens(), backward.tokens());
    assert_eq!(forward.successor_order(), backward.successor_order());
}

// ============================================================================
// Bounded Loads
// ============================================================================

#[test]
fn test_all_slots_assigned_under_cap() {
    let registry = registry_of(8);
    let ring = build(&registry, 9);
    let index = VNodeIndex::distribute(&ring, 256, 1.25).unwrap();

    assert_eq!(index.assigned(), 256);
    let cap = capacity(256, 8, 1.25);
    for (node, load) in index.loads() {
        assert!(*load <= cap, "{node} holds {load} > {cap}");
    }
}

#[test]
fn test_adding_node_moves_bounded_fraction() {
    let vnodes = 1024;
    let mut registry = registry_of(8);
    let mut ring = build(&registry, 9);
    let before = VNodeIndex::distribute(&ring, vnodes, 1.25).unwrap();

    let id = registry.insert("127.0.0.100", 1).unwrap();
    ring.add_node(registry.get(id).unwrap());
    let after = VNodeIndex::distribute(&ring, vnodes, 1.25).unwrap();

    let moved = (0..vnodes)
        .filter(|slot| before.owner(*slot) != after.owner(*slot))
        .count();

    // Roughly V/N slots go to the newcomer; far from a full reshuffle.
    assert!(moved > 0);
    assert!(
        moved < vnodes / 2,
        "too many slots moved: {moved}/{vnodes}"
    );
}

#[test]
fn test_removing_node_moves_bounded_fraction() {
    let vnodes = 1024;
    let mut registry = registry_of(8);
    let mut ring = build(&registry, 9);
    let before = VNodeIndex::distribute(&ring, vnodes, 1.25).unwrap();

    let gone = registry.remove("127.0.0.3").unwrap();
    ring.remove_node(gone.id);
    let after = VNodeIndex::distribute(&ring, vnodes, 1.25).unwrap();

    assert_eq!(after.load(gone.id), 0);
    let moved = (0..vnodes)
        .filter(|slot| before.owner(*slot) != after.owner(*slot))
        .count();
    assert!(
        moved < vnodes / 2,
        "too many slots moved: {moved}/{vnodes}"
    );
}

#[test]
fn test_no_distribution_slots() {
    let registry = registry_of(3);
    let ring = build(&registry, 9);
    let err = VNodeIndex::distribute(&ring, 300, 0.9).unwrap_err();
    assert!(matches!(err, Error::NoDistributionSlots { nodes: 3, .. }));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rebuild_respects_capacity(
        nodes in 1usize..40,
        vnodes in 1usize..700,
        keys in 1usize..12,
        load_factor in 1.0f64..2.0,
    ) {
        let registry = registry_of(nodes);
        let ring = build(&registry, keys);
        let index = VNodeIndex::distribute(&ring, vnodes, load_factor).unwrap();

        let cap = capacity(vnodes, nodes, load_factor);
        prop_assert_eq!(index.assigned(), vnodes);
        prop_assert!(index.is_built());
        for load in index.loads().values() {
            prop_assert!(*load <= cap);
        }
    }

    #[test]
    fn prop_successor_order_is_a_permutation(nodes in 1usize..30) {
        let registry = registry_of(nodes);
        let ring = build(&registry, 3);
        let mut order = ring.successor_order();
        order.sort();
        prop_assert_eq!(order, registry.ids());
    }
}
