//! Bounded-load consistent hashing placement.

use std::sync::Arc;

use corelib::vnode::{self, VNodeIndex};
use corelib::{HashRing, NodeId, NodeRegistry, Partitioner, RingConfig};
use tracing::{info, warn};

use crate::config::DistConfig;
use crate::error::Result;
use crate::grid::{CellId, Grid};
use crate::placement::{record_rebuild, Placement};

const NAME: &str = "ring";

/// Registry, ring and vnode index, always mutated together.
#[derive(Debug, Clone)]
pub struct RingPlacement {
    config: RingConfig,
    registry: NodeRegistry,
    ring: HashRing,
    index: VNodeIndex,
}

impl RingPlacement {
    pub fn new(config: RingConfig) -> Self {
        Self {
            ring: HashRing::with_config(&config),
            index: VNodeIndex::empty(config.vnode_count),
            registry: NodeRegistry::new(),
            config,
        }
    }

    pub fn ring(&self) -> &HashRing {
        &self.ring
    }

    pub fn index(&self) -> &VNodeIndex {
        &self.index
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    fn distribute(&self) -> corelib::Result<VNodeIndex> {
        VNodeIndex::distribute(&self.ring, self.config.vnode_count, self.config.load_factor)
    }

    fn reset(&mut self) {
        self.ring.clear();
        self.index = VNodeIndex::empty(self.config.vnode_count);
    }
}

impl Placement for RingPlacement {
    fn from_config(config: &DistConfig, _grid: Arc<dyn Grid>) -> Result<Self> {
        Ok(Self::new(config.ring_config().validated()?))
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn add_node(&mut self, addr: &str, weight: u32) -> Result<bool> {
        let Some(id) = self.registry.insert(addr, weight) else {
            return Ok(false);
        };
        if let Some(node) = self.registry.get(id) {
            self.ring.add_node(node);
        }

        match self.distribute() {
            Ok(index) => {
                self.index = index;
                record_rebuild(NAME, self.registry.len(), true);
                info!(
                    addr,
                    nodes = self.registry.len(),
                    vnodes = self.config.vnode_count,
                    capacity = self.index.capacity(),
                    "node added, vnodes redistributed"
                );
                Ok(true)
            }
            Err(err) => {
                self.ring.remove_node(id);
                self.registry.remove(addr);
                record_rebuild(NAME, self.registry.len(), false);
                warn!(addr, error = %err, "rebuild failed, node not added");
                Err(err.into())
            }
        }
    }

    fn remove_node(&mut self, addr: &str) -> bool {
        let Some(node) = self.registry.remove(addr) else {
            return false;
        };
        if self.registry.is_empty() {
            self.reset();
            record_rebuild(NAME, 0, true);
            info!(addr, "last node removed, ring cleared");
            return true;
        }

        self.ring.remove_node(node.id);
        match self.distribute() {
            Ok(index) => {
                self.index = index;
                record_rebuild(NAME, self.registry.len(), true);
                info!(
                    addr,
                    nodes = self.registry.len(),
                    capacity = self.index.capacity(),
                    "node removed, vnodes redistributed"
                );
            }
            Err(err) => {
                // The old index may point at the removed node; publish none.
                self.index = VNodeIndex::empty(self.config.vnode_count);
                record_rebuild(NAME, self.registry.len(), false);
                warn!(addr, error = %err, "rebuild failed after removal, vnode index cleared");
            }
        }
        true
    }

    fn owner(&self, cell: CellId) -> Option<NodeId> {
        let token = self.ring.partitioner().partition_u64(cell.0);
        self.index.owner_of(token)
    }

    fn successor_order(&self) -> Vec<NodeId> {
        self.ring.successor_order()
    }

    fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    fn loads(&self) -> Vec<(NodeId, usize)> {
        self.registry
            .iter()
            .map(|node| (node.id, self.index.load(node.id)))
            .filter(|(_, load)| *load > 0)
            .collect()
    }

    fn avg_load(&self) -> f64 {
        vnode::capacity(
            self.config.vnode_count,
            self.registry.len(),
            self.config.load_factor,
        ) as f64
    }

    fn slot_count(&self) -> usize {
        self.config.vnode_count
    }

    fn slot_of(&self, cell: CellId) -> usize {
        let token = self.ring.partitioner().partition_u64(cell.0);
        vnode::slot_for(token, self.config.vnode_count)
    }

    fn slot_owner(&self, slot: usize) -> Option<NodeId> {
        self.index.owner(slot)
    }
}
