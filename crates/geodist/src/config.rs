//! Distributor configuration.

use corelib::{PartitionerKind, RingConfig};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::level::Level;

pub const DEFAULT_LEVEL: u8 = 5;
pub const DEFAULT_NODE_WEIGHT: u32 = 1;

/// Everything needed to build a [`CellDistributor`](crate::CellDistributor).
///
/// Validated once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistConfig {
    /// Grid resolution, 0..=6.
    pub resolution: u8,
    /// Virtual node slots for the ring strategy; vnodes per node for the
    /// range strategy.
    pub vnode_count: usize,
    /// Placement keys per node on the ring.
    pub replication_keys: usize,
    /// Capacity multiplier over the average load.
    pub load_factor: f64,
    /// Default node weight, used by the range strategy only.
    pub node_weight: u32,
    pub partitioner: PartitionerKind,
}

impl Default for DistConfig {
    fn default() -> Self {
        let ring = RingConfig::default();
        Self {
            resolution: DEFAULT_LEVEL,
            vnode_count: ring.vnode_count,
            replication_keys: ring.replication_keys,
            load_factor: ring.load_factor,
            node_weight: DEFAULT_NODE_WEIGHT,
            partitioner: ring.partitioner,
        }
    }
}

impl DistConfig {
    pub fn with_resolution(resolution: u8) -> Self {
        Self {
            resolution,
            ..Default::default()
        }
    }

    pub fn level(&self) -> Result<Level> {
        Level::new(self.resolution)
    }

    pub fn ring_config(&self) -> RingConfig {
        RingConfig {
            vnode_count: self.vnode_count,
            replication_keys: self.replication_keys,
            load_factor: self.load_factor,
            partitioner: self.partitioner,
        }
    }

    /// Check the resolution and ring parameters and clamp the rest.
    pub fn validated(mut self) -> Result<Self> {
        self.level()?;
        let ring = self.ring_config().validated()?;
        self.replication_keys = ring.replication_keys;
        self.node_weight = self.node_weight.max(1);
        Ok(self)
    }
}
