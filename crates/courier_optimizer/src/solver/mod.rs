pub mod arc_cost;
pub mod construction;
pub mod guided_local_search;
pub mod insertion;
pub mod ls;
pub mod schedule;
pub mod score;
pub mod solution;
pub mod solver;
pub mod solver_params;
