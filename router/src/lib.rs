pub mod candidates;
pub mod check;
pub mod engine;
pub mod grid;
pub mod place;

use wirepath_common::db::core::Netlist;
use wirepath_common::util::config::RoutingConfig;

pub use engine::Session;

/// Routes a netlist end to end: seeds the default placement, then runs the
/// contention-reduction sweeps. The returned session holds the final grid
/// and wire routes.
pub fn route(netlist: Netlist, config: &RoutingConfig) -> Session {
    let mut session = Session::new(netlist);
    engine::run_routing(&mut session, config);
    session
}
