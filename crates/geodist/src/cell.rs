//! Values returned by distributor queries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::CellId;

/// A cell paired with the host currently assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistributedCell {
    pub cell: CellId,
    pub host: String,
}

impl DistributedCell {
    pub fn new(cell: CellId, host: impl Into<String>) -> Self {
        Self {
            cell,
            host: host.into(),
        }
    }

    /// Cell identifier in its hexadecimal string form.
    pub fn hex_id(&self) -> String {
        self.cell.to_string()
    }
}

impl fmt::Display for DistributedCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell{{host: {}, id: {}}}", self.host, self.cell)
    }
}

/// A neighboring cell and the distance from the query point to its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub cell: DistributedCell,
    pub distance_m: f64,
}

/// Number of slots (vnodes or spans) a host currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLoad {
    pub host: String,
    pub load: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let cell = DistributedCell::new(CellId(0x821fa7fffffffff), "127.0.0.1");
        assert_eq!(cell.hex_id(), "821fa7fffffffff");
        assert_eq!(cell.to_string(), "Cell{host: 127.0.0.1, id: 821fa7fffffffff}");
    }
}
