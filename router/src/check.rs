use crate::grid::{ContentionGrid, DenseGrid};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use wirepath_common::db::core::Wire;
use wirepath_common::geom::coord::GridCoord;

/// Verifies a routed session: every committed route must be well-formed,
/// and every grid cell must hold exactly the number of routes crossing it.
pub fn run(wires: &[Wire], grid: &DenseGrid) -> Result<(), String> {
    log::info!("Starting routing verification...");
    let valid = AtomicBool::new(true);

    wires.par_iter().enumerate().for_each(|(index, wire)| {
        if let Err(msg) = check_wire(wire, grid.dim_x(), grid.dim_y()) {
            log::error!("FAIL: wire {}: {}", index, msg);
            valid.store(false, Ordering::Relaxed);
        }
    });

    let mut counts = vec![0u32; (grid.dim_x() as usize) * (grid.dim_y() as usize)];
    for wire in wires {
        for cell in wire.cells() {
            counts[(cell.y * grid.dim_x() + cell.x) as usize] += 1;
        }
    }

    let snapshot = grid.snapshot();
    for (idx, (&expected, &stored)) in counts.iter().zip(&snapshot).enumerate() {
        if expected != stored {
            let x = idx as u32 % grid.dim_x();
            let y = idx as u32 / grid.dim_x();
            log::error!(
                "FAIL: cell ({}, {}) holds {} but {} routes cross it",
                x,
                y,
                stored,
                expected
            );
            valid.store(false, Ordering::Relaxed);
        }
    }

    if valid.load(Ordering::Relaxed) {
        log::info!("\x1b[32mPASS\x1b[0m: routes and grid are consistent.");
        Ok(())
    } else {
        Err("routing verification failed".to_string())
    }
}

/// A route is well-formed when its cell walk starts and ends on the wire's
/// endpoints, moves one cell at a time, stays in-grid, and never revisits
/// a cell. Bend-count and axis-alignment violations surface here as
/// non-adjacent consecutive cells.
fn check_wire(wire: &Wire, dim_x: u32, dim_y: u32) -> Result<(), String> {
    let cells: Vec<GridCoord> = wire.cells().collect();

    let first = cells.first().ok_or("route has no cells")?;
    let last = cells.last().ok_or("route has no cells")?;
    if *first != wire.start || *last != wire.end {
        return Err(format!(
            "route runs ({},{}) -> ({},{}) instead of joining its endpoints",
            first.x, first.y, last.x, last.y
        ));
    }

    let mut seen = HashSet::with_capacity(cells.len());
    for pair in cells.windows(2) {
        if pair[0].manhattan(pair[1]) != 1 {
            return Err(format!(
                "cells ({},{}) and ({},{}) are not adjacent",
                pair[0].x, pair[0].y, pair[1].x, pair[1].y
            ));
        }
    }
    for cell in &cells {
        if cell.x >= dim_x || cell.y >= dim_y {
            return Err(format!("cell ({},{}) is outside the grid", cell.x, cell.y));
        }
        if !seen.insert(*cell) {
            return Err(format!("cell ({},{}) is visited twice", cell.x, cell.y));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirepath_common::db::core::Netlist;
    use wirepath_common::geom::route::Route;

    fn routed_session(endpoints: &[(u32, u32, u32, u32)]) -> crate::Session {
        let netlist = Netlist {
            dim_x: 8,
            dim_y: 8,
            wires: endpoints
                .iter()
                .map(|&(sx, sy, ex, ey)| {
                    Wire::new(GridCoord::new(sx, sy), GridCoord::new(ex, ey))
                })
                .collect(),
        };
        crate::Session::new(netlist)
    }

    #[test]
    fn accepts_a_consistent_session() {
        let session = routed_session(&[(0, 0, 5, 5), (2, 7, 6, 1), (3, 3, 3, 6)]);
        assert!(run(&session.wires, &session.grid).is_ok());
    }

    #[test]
    fn rejects_a_grid_out_of_step_with_the_routes() {
        let session = routed_session(&[(0, 0, 5, 5)]);
        session.grid.add_wire(GridCoord::new(7, 7));
        assert!(run(&session.wires, &session.grid).is_err());
    }

    #[test]
    fn rejects_a_route_that_revisits_cells() {
        let wire = Wire {
            start: GridCoord::new(0, 0),
            end: GridCoord::new(4, 0),
            route: Route::TwoBend {
                first: GridCoord::new(3, 0),
                second: GridCoord::new(1, 0),
            },
        };
        assert!(check_wire(&wire, 8, 8).is_err());
    }

    #[test]
    fn rejects_a_route_leaving_the_grid() {
        let wire = Wire::new(GridCoord::new(0, 0), GridCoord::new(4, 0));
        assert!(check_wire(&wire, 3, 8).is_err());
        assert!(check_wire(&wire, 8, 8).is_ok());
    }
}
