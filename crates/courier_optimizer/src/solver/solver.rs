use std::sync::Arc;

use tracing::{Level, info, instrument, warn};

use crate::{
    problem::{node::NodeIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solution_set::{RoutePlan, SolutionSet, SolverStatus, Stop},
    solver::{
        construction::construct_solution::construct_solution,
        guided_local_search::GuidedLocalSearch,
        solution::{route::WorkingSolutionRoute, working_solution::WorkingSolution},
        solver_params::SolverParams,
    },
};

/// Construction followed by guided local search on one problem.
pub struct Solver {
    problem: Arc<VehicleRoutingProblem>,
    params: SolverParams,
}

impl Solver {
    pub fn new(problem: Arc<VehicleRoutingProblem>, params: SolverParams) -> Self {
        Solver { problem, params }
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        &self.problem
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn solve(&self) -> SolutionSet {
        info!(
            orders = self.problem.num_nodes() - 1,
            vehicles = self.problem.vehicles().len(),
            locations = self.problem.num_nodes(),
            objective = %self.problem.objective(),
            "Solving"
        );

        let initial = construct_solution(Arc::clone(&self.problem));
        let outcome =
            GuidedLocalSearch::new(Arc::clone(&self.problem), self.params.clone()).run(initial);

        let solution = &outcome.solution;
        if outcome.score.is_failure() {
            let unassigned = self.order_ids(solution, |node| !self.problem.node(node).is_optional());
            warn!(unassigned = ?unassigned, "No feasible assignment for every required order");
            return SolutionSet::infeasible(
                unassigned,
                self.order_ids(solution, |node| self.problem.node(node).is_optional()),
            );
        }

        let status = if outcome.converged {
            SolverStatus::Optimal
        } else {
            SolverStatus::Feasible
        };

        let routes: Vec<RoutePlan> = solution
            .non_empty_routes_iter()
            .map(|route| extract_route_plan(&self.problem, route))
            .collect();

        let solution_set = SolutionSet {
            status,
            total_distance_km: routes.iter().map(|route| route.total_distance_km).sum(),
            total_time_minutes: routes.iter().map(|route| route.total_time_minutes).sum(),
            routes,
            objective_value: outcome.score.soft_score,
            dropped_order_ids: self
                .order_ids(solution, |node| self.problem.node(node).is_optional()),
            unassigned_order_ids: Vec::new(),
            violations: Vec::new(),
        };

        info!(
            %status,
            routes = solution_set.num_routes(),
            distance_km = solution_set.total_distance_km,
            time_minutes = solution_set.total_time_minutes,
            dropped = solution_set.dropped_order_ids.len(),
            iterations = outcome.iterations,
            "Solution found"
        );

        solution_set
    }

    fn order_ids<F>(&self, solution: &WorkingSolution, filter: F) -> Vec<String>
    where
        F: Fn(NodeIdx) -> bool,
    {
        solution
            .unassigned()
            .iter()
            .filter(|&&node| filter(node))
            .map(|&node| self.problem.node(node).external_id().to_owned())
            .collect()
    }
}

fn extract_route_plan(problem: &VehicleRoutingProblem, route: &WorkingSolutionRoute) -> RoutePlan {
    let depot_id = problem.depot_node().external_id();
    let schedule = route.schedule();

    let mut stops = Vec::with_capacity(route.len() + 2);
    let mut load_sequence = Vec::with_capacity(route.len() + 2);
    let mut time_sequence = Vec::with_capacity(route.len() + 2);

    stops.push(Stop::Depot {
        id: depot_id.to_owned(),
    });
    load_sequence.push(0.0);
    time_sequence.push(schedule.start);

    let mut load = 0.0;
    for (position, &node_id) in route.nodes().iter().enumerate() {
        let node = problem.node(node_id);
        load += node.demand();

        stops.push(Stop::Delivery {
            order_id: node.external_id().to_owned(),
            cold_chain: node.is_cold_chain(),
        });
        load_sequence.push(load);
        time_sequence.push(schedule.service_starts[position]);
    }

    stops.push(Stop::Depot {
        id: depot_id.to_owned(),
    });
    load_sequence.push(load);
    time_sequence.push(schedule.end);

    let vehicle = route.vehicle(problem);
    RoutePlan {
        vehicle_id: vehicle.id.clone(),
        stops,
        load_sequence,
        time_sequence,
        total_distance_km: route.distance(problem),
        total_time_minutes: route.duration(),
        vehicle: vehicle.cost_profile(),
    }
}
