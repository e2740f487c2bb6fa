use crate::define_index_newtype;

use super::time_window::TimeWindow;

define_index_newtype!(NodeIdx, Node);

/// Node 0 is always the depot.
pub const DEPOT: NodeIdx = NodeIdx::new(0);

/// Solver-side view of a location to visit.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) external_id: String,
    pub(crate) demand: f64,
    pub(crate) service_time: i64,
    pub(crate) time_window: TimeWindow,
    pub(crate) cold_chain: bool,
    pub(crate) optional: bool,
}

impl Node {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn demand(&self) -> f64 {
        self.demand
    }

    pub fn service_time(&self) -> i64 {
        self.service_time
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn is_cold_chain(&self) -> bool {
        self.cold_chain
    }

    /// Optional nodes may be left unvisited at a penalty.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}
