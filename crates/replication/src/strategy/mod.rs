//! Replication strategy abstractions.
//!
//! - **SimpleStrategy**: the owner plus its N-1 distinct successors

pub mod simple;

pub use simple::SimpleStrategy;

use corelib::NodeId;

use crate::error::Result;

/// Trait for replication strategies.
///
/// The caller supplies the successor order of the topology (for the hash
/// ring, nodes sorted by their per-node ring position) and the primary owner
/// of the key. Implementations must be deterministic so every participant
/// computes the same replica set.
pub trait ReplicationStrategy: Send + Sync + 'static {
    /// Pick `n` nodes to hold a key owned by `owner`, primary first.
    ///
    /// # Errors
    ///
    /// [`ReplicationError::InsufficientNodes`](crate::ReplicationError) when
    /// `n` exceeds the number of nodes in `order`.
    fn replicas(&self, order: &[NodeId], owner: NodeId, n: usize) -> Result<Vec<NodeId>>;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
