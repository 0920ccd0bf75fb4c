//! H3 implementation of the grid, backed by `h3o`.

use h3o::{CellIndex, LatLng, Resolution};

use crate::grid::{CellId, GeoPoint, Grid};
use crate::level::Level;

/// Uber H3 grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct H3Grid;

impl From<CellIndex> for CellId {
    fn from(index: CellIndex) -> Self {
        CellId(u64::from(index))
    }
}

fn index(cell: CellId) -> Option<CellIndex> {
    CellIndex::try_from(cell.0).ok()
}

fn lat_lng(point: GeoPoint) -> Option<LatLng> {
    LatLng::new(point.lat, point.lon).ok()
}

fn resolution(level: Level) -> Resolution {
    match level.get() {
        0 => Resolution::Zero,
        1 => Resolution::One,
        2 => Resolution::Two,
        3 => Resolution::Three,
        4 => Resolution::Four,
        5 => Resolution::Five,
        _ => Resolution::Six,
    }
}

impl Grid for H3Grid {
    fn resolution_of(&self, cell: CellId) -> Option<u8> {
        index(cell).map(|c| u8::from(c.resolution()))
    }

    fn parent_of(&self, cell: CellId, level: Level) -> Option<CellId> {
        index(cell)?.parent(resolution(level)).map(CellId::from)
    }

    fn children_of(&self, cell: CellId, level: Level) -> Vec<CellId> {
        match index(cell) {
            Some(c) => c.children(resolution(level)).map(CellId::from).collect(),
            None => Vec::new(),
        }
    }

    fn base_cells(&self) -> Vec<CellId> {
        CellIndex::base_cells().map(CellId::from).collect()
    }

    fn from_lat_lon(&self, point: GeoPoint, level: Level) -> Option<CellId> {
        lat_lng(point).map(|ll| CellId::from(ll.to_cell(resolution(level))))
    }

    fn to_lat_lon(&self, cell: CellId) -> Option<GeoPoint> {
        index(cell).map(|c| {
            let center = LatLng::from(c);
            GeoPoint::new(center.lat(), center.lng())
        })
    }

    fn ring(&self, cell: CellId, k: u32) -> Vec<CellId> {
        match index(cell) {
            Some(c) => c
                .grid_disk::<Vec<_>>(k)
                .into_iter()
                .map(CellId::from)
                .collect(),
            None => Vec::new(),
        }
    }

    fn are_adjacent(&self, a: CellId, b: CellId) -> bool {
        match (index(a), index(b)) {
            (Some(a), Some(b)) => a.is_neighbor_with(b).unwrap_or(false),
            _ => false,
        }
    }

    fn distance_meters(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        match (lat_lng(a), lat_lng(b)) {
            (Some(a), Some(b)) => a.distance_m(b),
            _ => f64::NAN,
        }
    }

    fn encode(&self, cell: CellId) -> String {
        cell.to_string()
    }

    fn decode(&self, text: &str) -> Option<CellId> {
        text.parse::<CellIndex>().ok().map(CellId::from)
    }
}
