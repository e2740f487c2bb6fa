use std::iter;

use crate::solver::{
    arc_cost::ArcCost,
    ls::r#move::LocalSearchOperator,
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    solver_params::SolverParams,
};

/// Exchanges the nodes at `first` and `second` in the same route.
#[derive(Debug)]
pub struct SwapOperator {
    params: SwapOperatorParams,
}

#[derive(Debug)]
pub struct SwapOperatorParams {
    pub route_id: RouteIdx,
    pub first: usize,
    pub second: usize,
}

impl SwapOperator {
    pub fn new(params: SwapOperatorParams) -> Self {
        if params.first >= params.second {
            panic!("SwapOperator: 'first' must be before 'second'");
        }

        SwapOperator { params }
    }
}

impl LocalSearchOperator for SwapOperator {
    fn generate_moves<C>(
        solution: &WorkingSolution,
        _params: &SolverParams,
        (r1, r2): (RouteIdx, RouteIdx),
        mut consumer: C,
    ) where
        C: FnMut(Self),
    {
        if r1 != r2 {
            return;
        }

        let route = solution.route(r1);
        for first in 0..route.len() {
            for second in (first + 1)..route.len() {
                consumer(SwapOperator::new(SwapOperatorParams {
                    route_id: r1,
                    first,
                    second,
                }));
            }
        }
    }

    fn delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        let route = solution.route(self.params.route_id);
        let vehicle = route.vehicle_id();
        let SwapOperatorParams { first, second, .. } = self.params;

        let a = route.previous_node(first);
        let x = route.node(first);
        let y = route.node(second);
        let d = route.next_node(second);

        if first + 1 == second {
            // a - x - y - d becomes a - y - x - d
            let current_cost = costs.path_cost(vehicle, [a, x, y, d]);
            let new_cost = costs.path_cost(vehicle, [a, y, x, d]);
            return new_cost - current_cost;
        }

        let b = route.next_node(first);
        let c = route.previous_node(second);

        let current_cost = costs.path_cost(vehicle, [a, x, b])
            + costs.path_cost(vehicle, [c, y, d]);
        let new_cost = costs.path_cost(vehicle, [a, y, b])
            + costs.path_cost(vehicle, [c, x, d]);

        new_cost - current_cost
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let route = solution.route(self.params.route_id);
        let SwapOperatorParams { first, second, .. } = self.params;

        route.is_valid_change(
            solution.problem(),
            iter::once(route.node(second))
                .chain(route.nodes()[first + 1..second].iter().copied())
                .chain(iter::once(route.node(first))),
            first,
            second + 1,
        )
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let SwapOperatorParams {
            route_id,
            first,
            second,
        } = self.params;

        let mut nodes = solution.route(route_id).nodes()[first..=second].to_vec();
        let last = nodes.len() - 1;
        nodes.swap(0, last);

        solution.replace_route_nodes(route_id, &nodes, first, second + 1);
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.params.route_id]
    }
}
