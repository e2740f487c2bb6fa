use std::iter;

use crate::solver::{
    arc_cost::ArcCost,
    ls::r#move::LocalSearchOperator,
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    solver_params::SolverParams,
};

/// Exchanges one node between two routes, each taking the position of the other.
#[derive(Debug)]
pub struct InterSwapOperator {
    params: InterSwapOperatorParams,
}

#[derive(Debug)]
pub struct InterSwapOperatorParams {
    pub first_route_id: RouteIdx,
    pub second_route_id: RouteIdx,
    pub first: usize,
    pub second: usize,
}

impl InterSwapOperator {
    pub fn new(params: InterSwapOperatorParams) -> Self {
        if params.first_route_id == params.second_route_id {
            panic!("InterSwapOperator cannot be used for intra-route swap");
        }

        InterSwapOperator { params }
    }
}

impl LocalSearchOperator for InterSwapOperator {
    fn generate_moves<C>(
        solution: &WorkingSolution,
        _params: &SolverParams,
        (r1, r2): (RouteIdx, RouteIdx),
        mut consumer: C,
    ) where
        C: FnMut(Self),
    {
        // Symmetric, only one direction per pair
        if r1 >= r2 {
            return;
        }

        let first_route = solution.route(r1);
        let second_route = solution.route(r2);

        for first in 0..first_route.len() {
            for second in 0..second_route.len() {
                consumer(InterSwapOperator::new(InterSwapOperatorParams {
                    first_route_id: r1,
                    second_route_id: r2,
                    first,
                    second,
                }));
            }
        }
    }

    fn delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        let first_route = solution.route(self.params.first_route_id);
        let second_route = solution.route(self.params.second_route_id);
        let v1 = first_route.vehicle_id();
        let v2 = second_route.vehicle_id();

        let a1 = first_route.previous_node(self.params.first);
        let b1 = first_route.node(self.params.first);
        let c1 = first_route.next_node(self.params.first);

        let a2 = second_route.previous_node(self.params.second);
        let b2 = second_route.node(self.params.second);
        let c2 = second_route.next_node(self.params.second);

        let first_delta = costs.path_cost(v1, [a1, b2, c1]) - costs.path_cost(v1, [a1, b1, c1]);
        let second_delta = costs.path_cost(v2, [a2, b1, c2]) - costs.path_cost(v2, [a2, b2, c2]);

        first_delta + second_delta
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let problem = solution.problem();
        let first_route = solution.route(self.params.first_route_id);
        let second_route = solution.route(self.params.second_route_id);

        let b1 = first_route.node(self.params.first);
        let b2 = second_route.node(self.params.second);

        first_route.is_valid_change(
            problem,
            iter::once(b2),
            self.params.first,
            self.params.first + 1,
        ) && second_route.is_valid_change(
            problem,
            iter::once(b1),
            self.params.second,
            self.params.second + 1,
        )
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let b1 = solution.route(self.params.first_route_id).node(self.params.first);
        let b2 = solution.route(self.params.second_route_id).node(self.params.second);

        solution.replace_route_nodes(
            self.params.first_route_id,
            &[b2],
            self.params.first,
            self.params.first + 1,
        );
        solution.replace_route_nodes(
            self.params.second_route_id,
            &[b1],
            self.params.second,
            self.params.second + 1,
        );
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.params.first_route_id, self.params.second_route_id]
    }
}
