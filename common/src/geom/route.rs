use super::coord::GridCoord;
use super::segment;

/// Shape of a wire's path between its fixed endpoints.
///
/// Paths are axis-aligned polylines with at most two bends; the three
/// cases carry only the coordinates they need.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Endpoints share a row or a column.
    Straight,
    /// One axis to `bend`, the perpendicular axis to the end.
    OneBend { bend: GridCoord },
    /// Outer segments run on the same axis; the middle segment joining the
    /// two bends is perpendicular to them.
    TwoBend { first: GridCoord, second: GridCoord },
}

/// Ordered cells of a route from `start` to `end`, each emitted once.
///
/// A bend cell is emitted by the segment that enters it, so consecutive
/// segments never repeat their join; both endpoints are included. A route
/// of L1 length L therefore yields exactly L+1 cells.
pub fn route_cells(
    start: GridCoord,
    end: GridCoord,
    route: Route,
) -> impl Iterator<Item = GridCoord> {
    let (a, b) = match route {
        Route::Straight => (end, end),
        Route::OneBend { bend } => (bend, end),
        Route::TwoBend { first, second } => (first, second),
    };
    segment::walk(start, a, true)
        .chain(segment::walk(a, b, false))
        .chain(segment::walk(b, end, false))
}

/// Seed shape for a freshly read wire: the straight segment when the
/// endpoints share an axis, otherwise the horizontal-then-vertical L
/// through `(end.x, start.y)`.
pub fn default_route(start: GridCoord, end: GridCoord) -> Route {
    if start.x == end.x || start.y == end.y {
        Route::Straight
    } else {
        Route::OneBend {
            bend: GridCoord::new(end.x, start.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(start: (u32, u32), end: (u32, u32), route: Route) -> Vec<(u32, u32)> {
        route_cells(GridCoord::new(start.0, start.1), GridCoord::new(end.0, end.1), route)
            .map(|c| (c.x, c.y))
            .collect()
    }

    #[test]
    fn straight_route_covers_the_segment() {
        assert_eq!(
            cells((0, 0), (0, 3), Route::Straight),
            vec![(0, 0), (0, 1), (0, 2), (0, 3)]
        );
    }

    #[test]
    fn one_bend_emits_the_bend_once() {
        let route = Route::OneBend {
            bend: GridCoord::new(3, 0),
        };
        assert_eq!(
            cells((0, 0), (3, 3), route),
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (3, 2), (3, 3)]
        );
    }

    #[test]
    fn two_bend_emits_each_join_once() {
        let route = Route::TwoBend {
            first: GridCoord::new(1, 0),
            second: GridCoord::new(1, 3),
        };
        assert_eq!(
            cells((0, 0), (3, 3), route),
            vec![(0, 0), (1, 0), (1, 1), (1, 2), (1, 3), (2, 3), (3, 3)]
        );
    }

    #[test]
    fn cell_count_is_l1_length_plus_one() {
        let start = GridCoord::new(5, 1);
        let end = GridCoord::new(1, 6);
        let route = Route::TwoBend {
            first: GridCoord::new(3, 1),
            second: GridCoord::new(3, 6),
        };
        let count = route_cells(start, end, route).count() as u32;
        assert_eq!(count, start.manhattan(end) + 1);
    }

    #[test]
    fn default_route_bends_at_the_end_column() {
        assert_eq!(
            default_route(GridCoord::new(0, 0), GridCoord::new(3, 0)),
            Route::Straight
        );
        assert_eq!(
            default_route(GridCoord::new(0, 0), GridCoord::new(3, 3)),
            Route::OneBend {
                bend: GridCoord::new(3, 0)
            }
        );
    }

    #[test]
    fn decreasing_routes_walk_toward_the_end() {
        let route = Route::OneBend {
            bend: GridCoord::new(0, 2),
        };
        assert_eq!(
            cells((2, 2), (0, 0), route),
            vec![(2, 2), (1, 2), (0, 2), (0, 1), (0, 0)]
        );
    }
}
