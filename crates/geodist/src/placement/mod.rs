//! Cell placement strategies.
//!
//! A [`Placement`] owns the node registry and whatever structure maps cells
//! to nodes. Two strategies sit behind the same contract:
//!
//! - [`RingPlacement`]: bounded-load consistent hashing over a fixed vnode
//!   index. Moves only a small share of cells when the node set changes.
//! - [`RangePlacement`]: contiguous numeric spans of cells dealt to nodes by
//!   weighted round robin. Simpler, but re-partitions everything on change.
//!
//! Placements are plain single-threaded values; the
//! [`CellDistributor`](crate::CellDistributor) wraps one in a lock.

pub mod range;
pub mod ring;
pub mod round_robin;

use std::sync::Arc;

use corelib::{NodeId, NodeRegistry};

use crate::config::DistConfig;
use crate::error::Result;
use crate::grid::{CellId, Grid};

pub use range::{RangePlacement, Span};
pub use ring::RingPlacement;
pub use round_robin::WeightedRoundRobin;

pub trait Placement: Send + Sync + 'static {
    /// Build an empty placement from a validated config.
    fn from_config(config: &DistConfig, grid: Arc<dyn Grid>) -> Result<Self>
    where
        Self: Sized;

    fn name(&self) -> &'static str;

    /// Register `addr` and rebuild the assignment.
    ///
    /// Returns `Ok(false)` without rebuilding if the address is already
    /// known. On error the placement is left exactly as it was.
    fn add_node(&mut self, addr: &str, weight: u32) -> Result<bool>;

    /// Unregister `addr` and rebuild the assignment. Returns `false` if the
    /// address was unknown.
    fn remove_node(&mut self, addr: &str) -> bool;

    /// Node assigned to `cell`.
    fn owner(&self, cell: CellId) -> Option<NodeId>;

    /// Order in which replica successors are taken.
    fn successor_order(&self) -> Vec<NodeId>;

    fn registry(&self) -> &NodeRegistry;

    /// Slots held per node, in registry order. Nodes holding none are left out.
    fn loads(&self) -> Vec<(NodeId, usize)>;

    /// Expected (ring: maximum) slots per node.
    fn avg_load(&self) -> f64;

    /// Number of assignment slots.
    fn slot_count(&self) -> usize;

    /// Slot `cell` falls into.
    fn slot_of(&self, cell: CellId) -> usize;

    fn slot_owner(&self, slot: usize) -> Option<NodeId>;
}

/// Count a rebuild and publish the node gauge.
pub(crate) fn record_rebuild(strategy: &'static str, nodes: usize, ok: bool) {
    if ok {
        metrics::counter!("geodist_rebuilds_total", "strategy" => strategy).increment(1);
    } else {
        metrics::counter!("geodist_rebuild_failures_total", "strategy" => strategy).increment(1);
    }
    metrics::gauge!("geodist_nodes", "strategy" => strategy).set(nodes as f64);
}
