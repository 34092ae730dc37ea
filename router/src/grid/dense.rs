use super::ContentionGrid;
use std::sync::atomic::{AtomicU32, Ordering};
use wirepath_common::geom::coord::GridCoord;

/// Flat row-major grid of atomic wire counts.
///
/// Each cell is an `AtomicU32` updated with relaxed ordering, so sweep
/// workers stamp and read concurrently without a grid lock. A reader may
/// observe another worker's half-applied stamp mid-sweep; counts are exact
/// once all workers have committed, which is all the heuristic needs.
pub struct DenseGrid {
    dim_x: u32,
    dim_y: u32,
    cells: Vec<AtomicU32>,
}

impl DenseGrid {
    pub fn new(dim_x: u32, dim_y: u32) -> Self {
        let size = (dim_x as usize) * (dim_y as usize);

        if size > 2_000_000_000 {
            log::warn!(
                "Allocating large DenseGrid: {} cells. Ensure sufficient RAM.",
                size
            );
        }

        Self {
            dim_x,
            dim_y,
            cells: (0..size).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    #[inline(always)]
    fn index(&self, cell: GridCoord) -> usize {
        (cell.y as usize) * (self.dim_x as usize) + (cell.x as usize)
    }

    /// +1 on every cell of a route.
    pub fn stamp(&self, cells: impl Iterator<Item = GridCoord>) {
        for cell in cells {
            self.add_wire(cell);
        }
    }

    /// -1 on every cell of a route.
    pub fn unstamp(&self, cells: impl Iterator<Item = GridCoord>) {
        for cell in cells {
            self.remove_wire(cell);
        }
    }

    /// Copies the counts out of the atomics, row-major.
    pub fn snapshot(&self) -> Vec<u32> {
        self.cells
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed))
            .collect()
    }
}

impl ContentionGrid for DenseGrid {
    fn dim_x(&self) -> u32 {
        self.dim_x
    }
    fn dim_y(&self) -> u32 {
        self.dim_y
    }

    #[inline(always)]
    fn get(&self, cell: GridCoord) -> u32 {
        self.cells[self.index(cell)].load(Ordering::Relaxed)
    }

    #[inline(always)]
    fn add_wire(&self, cell: GridCoord) {
        self.cells[self.index(cell)].fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    fn remove_wire(&self, cell: GridCoord) {
        let prev = self.cells[self.index(cell)].fetch_sub(1, Ordering::Relaxed);
        debug_assert!(prev > 0, "unstamped a cell that held no wire");
    }

    fn max_occupancy(&self) -> u32 {
        self.cells
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed))
            .max()
            .unwrap_or(0)
    }

    fn contended_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.load(Ordering::Relaxed) > 1)
            .count()
    }

    fn total_usage(&self) -> u64 {
        self.cells
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed) as u64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirepath_common::db::core::Wire;

    #[test]
    fn stamp_then_unstamp_restores_the_grid() {
        let grid = DenseGrid::new(8, 8);
        let w1 = Wire::new(GridCoord::new(1, 1), GridCoord::new(6, 4));
        let w2 = Wire::new(GridCoord::new(0, 3), GridCoord::new(5, 3));

        grid.stamp(w1.cells());
        let before = grid.snapshot();

        grid.stamp(w2.cells());
        grid.unstamp(w2.cells());

        assert_eq!(grid.snapshot(), before);
    }

    #[test]
    fn counts_accumulate_per_cell() {
        let grid = DenseGrid::new(4, 4);
        let cell = GridCoord::new(2, 1);

        grid.add_wire(cell);
        grid.add_wire(cell);
        assert_eq!(grid.get(cell), 2);
        assert_eq!(grid.max_occupancy(), 2);
        assert_eq!(grid.contended_cells(), 1);
        assert_eq!(grid.total_usage(), 2);

        grid.remove_wire(cell);
        assert_eq!(grid.get(cell), 1);
        assert_eq!(grid.contended_cells(), 0);
    }

    #[test]
    fn snapshot_is_row_major() {
        let grid = DenseGrid::new(3, 2);
        grid.add_wire(GridCoord::new(2, 0));
        grid.add_wire(GridCoord::new(0, 1));

        assert_eq!(grid.snapshot(), vec![0, 0, 1, 1, 0, 0]);
    }
}
