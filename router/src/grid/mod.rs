pub mod dense;

pub use dense::DenseGrid;

use wirepath_common::geom::coord::GridCoord;

/// Shared per-cell wire counts over the routing area.
///
/// Stamp operations take `&self`: the sweep workers update the grid
/// concurrently, and an implementation must keep every cell's count
/// consistent without callers holding a lock.
pub trait ContentionGrid: Sync + Send {
    fn dim_x(&self) -> u32;
    fn dim_y(&self) -> u32;

    fn get(&self, cell: GridCoord) -> u32;
    fn add_wire(&self, cell: GridCoord);
    fn remove_wire(&self, cell: GridCoord);

    fn max_occupancy(&self) -> u32;
    /// Cells crossed by two or more wires.
    fn contended_cells(&self) -> usize;
    /// Sum of all counts, i.e. total cells occupied over all routes.
    fn total_usage(&self) -> u64;
}
