//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A full wrap of the ring found no node under capacity for a vnode slot.
    ///
    /// The rebuild that produced this error is discarded as a whole.
    #[error("no distribution slots: vnode {slot} found no node under capacity {capacity} ({nodes} nodes)")]
    NoDistributionSlots {
        /// The vnode slot that could not be placed.
        slot: u64,
        /// Per-node capacity in effect for the rebuild.
        capacity: usize,
        /// Number of nodes on the ring.
        nodes: usize,
    },

    /// Invalid ring configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
