use crate::geom::coord::GridCoord;
use crate::geom::route::{self, Route};

/// A two-pin wire with fixed endpoints and a mutable committed route.
#[derive(Clone, Copy, Debug)]
pub struct Wire {
    pub start: GridCoord,
    pub end: GridCoord,
    pub route: Route,
}

impl Wire {
    /// Constructs the wire on its default seed route.
    pub fn new(start: GridCoord, end: GridCoord) -> Self {
        Self {
            start,
            end,
            route: route::default_route(start, end),
        }
    }

    /// Ordered cells of the committed route, start to end, each once.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> {
        route::route_cells(self.start, self.end, self.route)
    }

    pub fn is_collinear(&self) -> bool {
        self.start.x == self.end.x || self.start.y == self.end.y
    }

    /// Number of cells every route of this wire occupies.
    pub fn route_len(&self) -> u32 {
        self.start.manhattan(self.end) + 1
    }
}

/// The routing problem as read from an input file: grid dimensions and the
/// wire collection.
#[derive(Clone, Debug)]
pub struct Netlist {
    pub dim_x: u32,
    pub dim_y: u32,
    pub wires: Vec<Wire>,
}

impl Netlist {
    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }

    pub fn in_bounds(&self, cell: GridCoord) -> bool {
        cell.x < self.dim_x && cell.y < self.dim_y
    }
}
