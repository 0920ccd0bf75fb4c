//! Range placement: contiguous spans of cells dealt out by weighted round robin.
//!
//! Cells at the configured level are walked in ascending numeric order and
//! cut into spans of `cell_count / (vnodes_per_node * node_count)` cells.
//! Each span goes to the next node of a [`WeightedRoundRobin`]. Lookup is a
//! binary search on span starts.
//!
//! Every add or remove re-partitions the whole grid over the remaining
//! nodes, so most cells change owner on any topology change.

use std::collections::BTreeMap;
use std::sync::Arc;

use corelib::{NodeId, NodeRegistry};
use tracing::info;

use crate::config::DistConfig;
use crate::error::Result;
use crate::grid::{CellId, Grid};
use crate::iter::each_cell;
use crate::level::Level;
use crate::placement::round_robin::WeightedRoundRobin;
use crate::placement::{record_rebuild, Placement};

const NAME: &str = "range";

/// A run of cells starting at `start` and ending before the next span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: CellId,
    pub node_id: NodeId,
}

#[derive(Debug, Clone)]
pub struct RangePlacement {
    grid: Arc<dyn Grid>,
    level: Level,
    vnodes_per_node: usize,
    registry: NodeRegistry,
    spans: Vec<Span>,
}

impl RangePlacement {
    pub fn new(grid: Arc<dyn Grid>, level: Level, vnodes_per_node: usize) -> Self {
        Self {
            grid,
            level,
            vnodes_per_node: vnodes_per_node.max(1),
            registry: NodeRegistry::new(),
            spans: Vec::new(),
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Cells per span for the current node count.
    pub fn span_len(&self) -> u64 {
        let slots = (self.vnodes_per_node * self.registry.len().max(1)) as u64;
        (self.level.cell_count() / slots).max(1)
    }

    fn partition(&self) -> Vec<Span> {
        let mut selector = WeightedRoundRobin::new();
        for node in self.registry.iter() {
            selector.add(node.id, node.weight);
        }
        if selector.is_empty() {
            return Vec::new();
        }

        let step = self.span_len();
        let mut spans = Vec::with_capacity((self.level.cell_count() / step) as usize + 1);
        each_cell(self.grid.as_ref(), self.level, |index, cell| {
            if (index - 1) % step != 0 {
                return;
            }
            if let Some(node_id) = selector.next() {
                spans.push(Span {
                    start: cell,
                    node_id,
                });
            }
        });
        spans
    }

    fn rebuild(&mut self, addr: &str, action: &str) {
        self.spans = self.partition();
        record_rebuild(NAME, self.registry.len(), true);
        info!(
            addr,
            nodes = self.registry.len(),
            spans = self.spans.len(),
            span_len = self.span_len(),
            "{}, cell ranges repartitioned",
            action
        );
    }

    fn span_index(&self, cell: CellId) -> Option<usize> {
        self.spans
            .partition_point(|span| span.start <= cell)
            .checked_sub(1)
    }
}

impl Placement for RangePlacement {
    fn from_config(config: &DistConfig, grid: Arc<dyn Grid>) -> Result<Self> {
        Ok(Self::new(grid, config.level()?, config.vnode_count))
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn add_node(&mut self, addr: &str, weight: u32) -> Result<bool> {
        if self.registry.insert(addr, weight).is_none() {
            return Ok(false);
        }
        self.rebuild(addr, "node added");
        Ok(true)
    }

    fn remove_node(&mut self, addr: &str) -> bool {
        if self.registry.remove(addr).is_none() {
            return false;
        }
        self.rebuild(addr, "node removed");
        true
    }

    fn owner(&self, cell: CellId) -> Option<NodeId> {
        self.span_index(cell).map(|idx| self.spans[idx].node_id)
    }

    fn successor_order(&self) -> Vec<NodeId> {
        self.registry.ids()
    }

    fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    fn loads(&self) -> Vec<(NodeId, usize)> {
        let mut counts: BTreeMap<NodeId, usize> = BTreeMap::new();
        for span in &self.spans {
            *counts.entry(span.node_id).or_insert(0) += 1;
        }
        self.registry
            .iter()
            .filter_map(|node| counts.get(&node.id).map(|load| (node.id, *load)))
            .collect()
    }

    fn avg_load(&self) -> f64 {
        if self.registry.is_empty() {
            return 0.0;
        }
        self.spans.len() as f64 / self.registry.len() as f64
    }

    fn slot_count(&self) -> usize {
        self.spans.len()
    }

    fn slot_of(&self, cell: CellId) -> usize {
        self.span_index(cell).unwrap_or(0)
    }

    fn slot_owner(&self, slot: usize) -> Option<NodeId> {
        self.spans.get(slot).map(|span| span.node_id)
    }
}
