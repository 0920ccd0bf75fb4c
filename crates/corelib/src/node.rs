//! Node abstractions for the consistent hash ring.
//!
//! Nodes are owned by a single [`NodeRegistry`]. The ring, the vnode index and
//! everything built on top of them refer to a node through its compact
//! [`NodeId`], never by reference, so removing a node cannot leave anything
//! dangling.

use std::fmt;

/// Compact, stable identifier for a node in a registry.
///
/// Ids are allocated monotonically and never reused by the same registry.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Logical node participating in the ring.
///
/// Keep this struct small and cheap to clone; it is copied into every
/// published snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Network address or hostname; the identity callers use.
    pub addr: String,
    /// Relative weight, always at least 1. Only the range partitioner uses it.
    pub weight: u32,
}

impl Node {
    pub fn new(id: NodeId, addr: impl Into<String>, weight: u32) -> Self {
        Self {
            id,
            addr: addr.into(),
            weight: weight.max(1),
        }
    }
}

/// The set of currently known nodes, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct NodeRegistry {
    // Sorted by id, which is also insertion order.
    nodes: Vec<Node>,
    next_id: u32,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Returns `None` if the address is already known.
    pub fn insert(&mut self, addr: &str, weight: u32) -> Option<NodeId> {
        if self.exists(addr) {
            return None;
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node::new(id, addr, weight));
        Some(id)
    }

    /// Unregister a node by address.
    pub fn remove(&mut self, addr: &str) -> Option<Node> {
        let pos = self.nodes.iter().position(|n| n.addr == addr)?;
        Some(self.nodes.remove(pos))
    }

    /// Membership check; a linear scan over the registry.
    pub fn exists(&self, addr: &str) -> bool {
        self.nodes.iter().any(|n| n.addr == addr)
    }

    pub fn find(&self, addr: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.addr == addr)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .binary_search_by_key(&id, |n| n.id)
            .ok()
            .map(|idx| &self.nodes[idx])
    }

    /// Address of a node, if still registered.
    pub fn addr(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.addr.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn addrs(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.addr.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = NodeRegistry::new();
        let a = registry.insert("10.0.0.1", 1).unwrap();
        let b = registry.insert("10.0.0.2", 3).unwrap();

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert!(registry.exists("10.0.0.1"));
        assert_eq!(registry.addr(b), Some("10.0.0.2"));
        assert_eq!(registry.get(b).unwrap().weight, 3);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut registry = NodeRegistry::new();
        assert!(registry.insert("10.0.0.1", 1).is_some());
        assert!(registry.insert("10.0.0.1", 5).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut registry = NodeRegistry::new();
        let a = registry.insert("a", 1).unwrap();
        registry.insert("b", 1).unwrap();
        assert_eq!(registry.remove("a").map(|n| n.id), Some(a));

        let again = registry.insert("a", 1).unwrap();
        assert_ne!(again, a);
        assert!(registry.get(a).is_none());
        assert_eq!(registry.addrs(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_zero_weight_clamped() {
        let mut registry = NodeRegistry::new();
        let id = registry.insert("a", 0).unwrap();
        assert_eq!(registry.get(id).unwrap().weight, 1);
    }

    #[test]
    fn test_remove_unknown() {
        let mut registry = NodeRegistry::new();
        assert!(registry.remove("missing").is_none());
        assert!(registry.is_empty());
    }
}
