//! Enumeration of every cell at a level.

use crate::grid::{CellId, Grid};
use crate::level::Level;

/// Call `f` for every cell at `level`, with a running 1-based index.
///
/// Cells come base cell by base cell, each base cell's descendants in
/// ascending order.
pub fn each_cell<F>(grid: &dyn Grid, level: Level, mut f: F)
where
    F: FnMut(u64, CellId),
{
    let mut next = 0u64;
    for base in grid.base_cells() {
        if level == Level::MIN {
            next += 1;
            f(next, base);
            continue;
        }
        for cell in grid.children_of(base, level) {
            next += 1;
            f(next, cell);
        }
    }
}
