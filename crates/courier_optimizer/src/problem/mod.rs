pub mod constraint_set;
pub mod depot;
pub mod location;
pub mod node;
pub mod objective;
pub mod order;
pub mod problem_error;
pub mod time_window;
pub mod travel_cost_matrix;
pub mod vehicle;
pub mod vehicle_routing_problem;
