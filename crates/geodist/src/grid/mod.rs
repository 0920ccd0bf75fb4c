//! The geospatial grid seam.
//!
//! Everything this crate knows about the hexagonal grid goes through the
//! [`Grid`] trait: hierarchy (parent, children, base cells), geometry
//! (coordinates, adjacency, distance) and the textual form of a cell. The
//! production implementation is [`H3Grid`].

pub mod h3;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::level::Level;

pub use self::h3::H3Grid;

/// Opaque 64-bit cell identifier.
///
/// Treated as a hash key by the ring strategy and as an ordered number by
/// the range strategy.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub u64);

impl CellId {
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for CellId {
    fn from(value: u64) -> Self {
        CellId(value)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// A point on the globe, in degrees.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Operations consumed from the hierarchical hexagonal grid.
///
/// Implementations must be pure: the same input always yields the same
/// output. `children_of` on a base cell must yield cells in ascending
/// numeric order, which the range strategy relies on.
pub trait Grid: Send + Sync + fmt::Debug {
    /// Resolution of `cell`, `None` if it is not a valid cell.
    fn resolution_of(&self, cell: CellId) -> Option<u8>;

    /// Ancestor of `cell` at `level`.
    fn parent_of(&self, cell: CellId, level: Level) -> Option<CellId>;

    /// Descendants of `cell` at `level`.
    fn children_of(&self, cell: CellId, level: Level) -> Vec<CellId>;

    /// The resolution-0 cells, in ascending order.
    fn base_cells(&self) -> Vec<CellId>;

    /// Cell containing `point` at `level`; `None` for an invalid coordinate.
    fn from_lat_lon(&self, point: GeoPoint, level: Level) -> Option<CellId>;

    /// Center of `cell`.
    fn to_lat_lon(&self, cell: CellId) -> Option<GeoPoint>;

    /// All cells within `k` steps of `cell`, including `cell` itself.
    fn ring(&self, cell: CellId, k: u32) -> Vec<CellId>;

    /// True if `a` and `b` share an edge.
    fn are_adjacent(&self, a: CellId, b: CellId) -> bool;

    /// Great-circle distance in meters.
    fn distance_meters(&self, a: GeoPoint, b: GeoPoint) -> f64;

    fn encode(&self, cell: CellId) -> String;

    fn decode(&self, text: &str) -> Option<CellId>;
}
