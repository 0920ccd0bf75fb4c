//! The concurrent distributor facade.
//!
//! [`CellDistributor`] wraps one [`Placement`] in a reader-writer lock.
//! `add`/`remove` take the write side and rebuild the assignment before
//! releasing it; every query takes the read side. Readers therefore only ever
//! see a fully built assignment.
//!
//! Bulk iterations ([`CellDistributor::each_cell`],
//! [`CellDistributor::lookup_many`]) hold the read lock for their whole
//! duration: their callbacks must not call `add` or `remove` on the same
//! distributor.

use std::sync::Arc;

use parking_lot::RwLock;
use replication::{ReplicationStrategy, SimpleStrategy};
use tracing::debug;

use crate::cell::{DistributedCell, Neighbor, NodeLoad};
use crate::config::DistConfig;
use crate::error::{Error, Result};
use crate::grid::{CellId, GeoPoint, Grid, H3Grid};
use crate::iter;
use crate::level::Level;
use crate::placement::{Placement, RangePlacement, RingPlacement};

/// Assigns grid cells to cluster nodes.
///
/// # Example
///
/// ```no_run
/// use geodist::{CellDistributor, DistConfig};
///
/// let dist = CellDistributor::new(DistConfig::with_resolution(3))?;
/// dist.add("127.0.0.1")?;
/// dist.add("127.0.0.2")?;
///
/// let cell = dist.lookup_from_lat_lon(52.52, 13.405)?;
/// println!("{} is served by {}", cell.hex_id(), cell.host);
/// # Ok::<(), geodist::Error>(())
/// ```
#[derive(Debug)]
pub struct CellDistributor<P: Placement = RingPlacement> {
    config: DistConfig,
    level: Level,
    grid: Arc<dyn Grid>,
    replication: SimpleStrategy,
    state: RwLock<P>,
}

/// Distributor using the range strategy.
pub type RangeDistributor = CellDistributor<RangePlacement>;

impl CellDistributor<RingPlacement> {
    /// Bounded-load ring distributor over the H3 grid.
    pub fn new(config: DistConfig) -> Result<Self> {
        Self::with_grid(config, Arc::new(H3Grid))
    }
}

impl CellDistributor<RangePlacement> {
    /// Range-partitioning distributor over the H3 grid.
    pub fn ranged(config: DistConfig) -> Result<Self> {
        Self::with_grid(config, Arc::new(H3Grid))
    }
}

impl<P: Placement> CellDistributor<P> {
    pub fn with_grid(config: DistConfig, grid: Arc<dyn Grid>) -> Result<Self> {
        let config = config.validated()?;
        let level = config.level()?;
        let placement = P::from_config(&config, Arc::clone(&grid))?;
        Ok(Self {
            config,
            level,
            grid,
            replication: SimpleStrategy::new(),
            state: RwLock::new(placement),
        })
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn config(&self) -> &DistConfig {
        &self.config
    }

    pub fn grid(&self) -> &Arc<dyn Grid> {
        &self.grid
    }

    /// Name of the placement strategy.
    pub fn strategy(&self) -> &'static str {
        self.state.read().name()
    }

    /// Add a node with the configured default weight.
    ///
    /// Adding a known address is a no-op. On
    /// [`NoDistributionSlots`](corelib::Error::NoDistributionSlots) the node
    /// is not added and the previous assignment stays in effect.
    pub fn add(&self, addr: &str) -> Result<()> {
        self.add_weighted(addr, self.config.node_weight)
    }

    /// Add a node with an explicit weight (range strategy only).
    pub fn add_weighted(&self, addr: &str, weight: u32) -> Result<()> {
        let mut state = self.state.write();
        if !state.add_node(addr, weight)? {
            debug!(addr, "node already registered");
        }
        Ok(())
    }

    /// Remove a node. Returns `false` if the address was unknown.
    pub fn remove(&self, addr: &str) -> bool {
        self.state.write().remove_node(addr)
    }

    pub fn lookup(&self, cell: CellId) -> Option<DistributedCell> {
        let state = self.state.read();
        owner_addr(&*state, cell).map(|host| DistributedCell::new(cell, host))
    }

    /// Look up every cell in `cells`, calling `visit` for each one with an
    /// owner. `visit` returns `false` to stop early.
    ///
    /// Returns `false` if there was nothing to visit or the visit was
    /// stopped, `true` otherwise.
    pub fn lookup_many<F>(&self, cells: &[CellId], mut visit: F) -> bool
    where
        F: FnMut(&DistributedCell) -> bool,
    {
        let state = self.state.read();
        if cells.is_empty() || state.registry().is_empty() {
            return false;
        }
        for &cell in cells {
            let Some(host) = owner_addr(&*state, cell) else {
                continue;
            };
            if !visit(&DistributedCell::new(cell, host)) {
                return false;
            }
        }
        true
    }

    /// Visit every cell at the configured level with its owner.
    pub fn each_cell<F>(&self, mut visit: F)
    where
        F: FnMut(&DistributedCell),
    {
        let state = self.state.read();
        if state.registry().is_empty() {
            return;
        }
        iter::each_cell(self.grid.as_ref(), self.level, |_, cell| {
            if let Some(host) = owner_addr(&*state, cell) {
                visit(&DistributedCell::new(cell, host));
            }
        });
    }

    /// `n` distinct hosts for `cell`, its owner first.
    pub fn replica_for(&self, cell: CellId, n: usize) -> Result<Vec<String>> {
        let state = self.state.read();
        let registry = state.registry();
        if n > registry.len() {
            return Err(replication::ReplicationError::InsufficientNodes {
                want: n,
                have: registry.len(),
            }
            .into());
        }
        let owner = state.owner(cell).ok_or(Error::NoOwner)?;
        let replicas = self
            .replication
            .replicas(&state.successor_order(), owner, n)?;
        Ok(replicas
            .into_iter()
            .filter_map(|id| registry.addr(id).map(str::to_owned))
            .collect())
    }

    /// The ancestor of `child` at the configured level, with its owner.
    ///
    /// `child` must be at the configured level or finer.
    pub fn where_is_my_parent(&self, child: CellId) -> Result<DistributedCell> {
        let got = self
            .grid
            .resolution_of(child)
            .ok_or(Error::InvalidCell(child))?;
        if got < self.level.get() {
            return Err(Error::ResolutionMismatch {
                got,
                want: self.level.get(),
            });
        }
        let parent = self
            .grid
            .parent_of(child, self.level)
            .ok_or(Error::InvalidCell(child))?;

        let state = self.state.read();
        let host = owner_addr(&*state, parent).ok_or(Error::NoOwner)?;
        Ok(DistributedCell::new(parent, host))
    }

    /// The cell containing a coordinate, with its owner.
    pub fn lookup_from_lat_lon(&self, lat: f64, lon: f64) -> Result<DistributedCell> {
        let cell = self.cell_at(GeoPoint::new(lat, lon))?;
        let state = self.state.read();
        let host = owner_addr(&*state, cell).ok_or(Error::NoOwner)?;
        Ok(DistributedCell::new(cell, host))
    }

    /// The cell containing a coordinate, plus its edge-adjacent neighbors
    /// sorted by ascending distance from the coordinate to their centers.
    ///
    /// Neighbors without an owner are skipped.
    pub fn neighbors_from_lat_lon(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<(DistributedCell, Vec<Neighbor>)> {
        let point = GeoPoint::new(lat, lon);
        let cell = self.cell_at(point)?;

        let state = self.state.read();
        let host = owner_addr(&*state, cell).ok_or(Error::NoOwner)?;
        let target = DistributedCell::new(cell, host);

        let disk = self.grid.ring(cell, 1);
        let mut neighbors = Vec::with_capacity(disk.len());
        for other in disk {
            if other == cell || !self.grid.are_adjacent(cell, other) {
                continue;
            }
            let Some(host) = owner_addr(&*state, other) else {
                continue;
            };
            let Some(center) = self.grid.to_lat_lon(other) else {
                continue;
            };
            neighbors.push(Neighbor {
                cell: DistributedCell::new(other, host),
                distance_m: self.grid.distance_meters(point, center),
            });
        }
        neighbors.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));

        Ok((target, neighbors))
    }

    /// True if `cell` is still assigned to the host recorded in it.
    pub fn is_owned(&self, cell: &DistributedCell) -> bool {
        let state = self.state.read();
        owner_addr(&*state, cell.cell) == Some(cell.host.as_str())
    }

    /// Slots held per host.
    pub fn stats(&self) -> Vec<NodeLoad> {
        let state = self.state.read();
        let registry = state.registry();
        state
            .loads()
            .into_iter()
            .filter_map(|(id, load)| {
                registry.addr(id).map(|host| NodeLoad {
                    host: host.to_owned(),
                    load,
                })
            })
            .collect()
    }

    /// Node addresses in insertion order.
    pub fn nodes(&self) -> Vec<String> {
        self.state.read().registry().addrs()
    }

    /// Configured number of virtual nodes.
    pub fn vnodes(&self) -> usize {
        self.config.vnode_count
    }

    /// Placement keys per node on the ring.
    pub fn num_replica(&self) -> usize {
        self.config.replication_keys
    }

    pub fn avg_load(&self) -> f64 {
        self.state.read().avg_load()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().registry().is_empty()
    }

    /// Slot (vnode or span) `cell` falls into.
    pub fn vnode_index(&self, cell: CellId) -> usize {
        self.state.read().slot_of(cell)
    }

    /// Host owning a slot.
    pub fn addr(&self, slot: usize) -> Option<String> {
        let state = self.state.read();
        let id = state.slot_owner(slot)?;
        state.registry().addr(id).map(str::to_owned)
    }

    /// Visit every assigned slot with its host. `visit` returns `false` to
    /// stop.
    pub fn each_vnode<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &str) -> bool,
    {
        let state = self.state.read();
        for slot in 0..state.slot_count() {
            let Some(host) = state.slot_owner(slot).and_then(|id| state.registry().addr(id)) else {
                continue;
            };
            if !visit(slot, host) {
                break;
            }
        }
    }

    fn cell_at(&self, point: GeoPoint) -> Result<CellId> {
        self.grid
            .from_lat_lon(point, self.level)
            .ok_or(Error::InvalidCoordinate {
                lat: point.lat,
                lon: point.lon,
            })
    }
}

fn owner_addr<P: Placement>(state: &P, cell: CellId) -> Option<&str> {
    state.owner(cell).and_then(|id| state.registry().addr(id))
}
