//! Errors returned by the distributor.

use replication::ReplicationError;

use crate::grid::CellId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The resolution is outside the supported 0..=6 table.
    #[error("unsupported resolution {0}, expected 0..=6")]
    InvalidResolution(u8),

    /// Ring configuration or rebuild failure, e.g. no distribution slots.
    #[error(transparent)]
    Ring(#[from] corelib::Error),

    /// Replica selection failure, e.g. insufficient nodes.
    #[error(transparent)]
    Replication(#[from] ReplicationError),

    /// No node owns the cell: the node set is empty or the index is not built.
    #[error("no owner: vnodes not found")]
    NoOwner,

    /// A parent query got a child coarser than the configured resolution.
    #[error("child resolution {got}, expected >= {want}")]
    ResolutionMismatch { got: u8, want: u8 },

    #[error("invalid cell index {0}")]
    InvalidCell(CellId),

    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

impl Error {
    /// True for a rebuild that found no node under capacity.
    pub fn is_no_distribution_slots(&self) -> bool {
        matches!(self, Error::Ring(corelib::Error::NoDistributionSlots { .. }))
    }

    /// True when more replicas were requested than there are nodes.
    pub fn is_insufficient_nodes(&self) -> bool {
        matches!(
            self,
            Error::Replication(ReplicationError::InsufficientNodes { .. })
        )
    }
}
