//! Geospatial cell distribution.
//!
//! Assigns every cell of a hierarchical hexagonal grid, at one fixed
//! resolution, to a node of a cluster, and answers "who owns this cell",
//! "who owns the parent of this cell", "who owns the cell at this
//! coordinate and its neighbors" and "which hosts hold the replicas".
//!
//! Two placement strategies are available:
//!
//! - [`RingPlacement`] (default): bounded-load consistent hashing over a
//!   fixed number of virtual nodes. See [`corelib`].
//! - [`RangePlacement`]: contiguous ranges of cells dealt out by weighted
//!   round robin.
//!
//! [`CellDistributor`] is safe to share between threads: topology changes
//! are serialized and queries never observe a half-built assignment.

pub mod cell;
pub mod config;
pub mod distributor;
pub mod error;
pub mod grid;
pub mod iter;
pub mod level;
pub mod placement;

pub use cell::{DistributedCell, Neighbor, NodeLoad};
pub use config::DistConfig;
pub use distributor::{CellDistributor, RangeDistributor};
pub use error::{Error, Result};
pub use grid::{CellId, GeoPoint, Grid, H3Grid};
pub use iter::each_cell;
pub use level::{cell_count, Level};
pub use placement::{Placement, RangePlacement, RingPlacement};

pub use corelib::PartitionerKind;
