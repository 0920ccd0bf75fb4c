//! Ring configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::partitioner::PartitionerKind;

pub const DEFAULT_VNODES: usize = 256;
pub const DEFAULT_REPLICATION_KEYS: usize = 9;
pub const DEFAULT_LOAD_FACTOR: f64 = 1.25;
pub const MIN_REPLICATION_KEYS: usize = 1;

/// Parameters of the hash ring and the bounded-load distributor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Number of virtual node slots (V).
    pub vnode_count: usize,
    /// Placement keys per node on the ring (R).
    pub replication_keys: usize,
    /// Multiplier over the average load giving the per-node capacity.
    pub load_factor: f64,
    pub partitioner: PartitionerKind,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            vnode_count: DEFAULT_VNODES,
            replication_keys: DEFAULT_REPLICATION_KEYS,
            load_factor: DEFAULT_LOAD_FACTOR,
            partitioner: PartitionerKind::default(),
        }
    }
}

impl RingConfig {
    /// Check and normalize the configuration.
    ///
    /// `replication_keys` is clamped to at least [`MIN_REPLICATION_KEYS`];
    /// a zero vnode count or a non-positive load factor is rejected.
    pub fn validated(mut self) -> Result<Self> {
        if self.vnode_count == 0 {
            return Err(Error::InvalidConfig("vnode_count must be positive".into()));
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "load_factor must be a positive number, got {}",
                self.load_factor
            )));
        }
        self.replication_keys = self.replication_keys.max(MIN_REPLICATION_KEYS);
        Ok(self)
    }
}
