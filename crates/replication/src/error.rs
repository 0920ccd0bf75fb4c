//! Error types for replica selection.

use corelib::NodeId;

pub type Result<T> = std::result::Result<T, ReplicationError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplicationError {
    /// More replicas were requested than there are nodes.
    #[error("insufficient number of nodes: want {want}, have {have}")]
    InsufficientNodes { want: usize, have: usize },

    /// The primary owner is not part of the successor order.
    #[error("owner {0} is not on the ring")]
    UnknownOwner(NodeId),
}
