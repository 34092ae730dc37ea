use crate::grid::DenseGrid;
use wirepath_common::db::core::Wire;
use wirepath_common::geom::route;

/// Seeds every wire with its default route (the horizontal-first L through
/// `(end.x, start.y)`, or the straight segment when collinear) and stamps
/// it into the grid. This is the state the re-routing sweeps improve.
pub fn seed(wires: &mut [Wire], grid: &DenseGrid) {
    for wire in wires.iter_mut() {
        wire.route = route::default_route(wire.start, wire.end);
        grid.stamp(wire.cells());
    }
}
