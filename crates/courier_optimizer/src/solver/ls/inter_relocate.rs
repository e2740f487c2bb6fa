use std::iter;

use crate::solver::{
    arc_cost::ArcCost,
    ls::r#move::LocalSearchOperator,
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    solver_params::SolverParams,
};

/// Moves the node at `from` in the first route before position `to` of the second one.
#[derive(Debug)]
pub struct InterRelocateOperator {
    params: InterRelocateParams,
}

#[derive(Debug)]
pub struct InterRelocateParams {
    pub from_route_id: RouteIdx,
    pub to_route_id: RouteIdx,
    pub from: usize,
    pub to: usize,
}

impl InterRelocateOperator {
    pub fn new(params: InterRelocateParams) -> Self {
        if params.from_route_id == params.to_route_id {
            panic!("InterRelocateOperator cannot be used for intra-route relocate");
        }

        InterRelocateOperator { params }
    }
}

impl LocalSearchOperator for InterRelocateOperator {
    fn generate_moves<C>(
        solution: &WorkingSolution,
        _params: &SolverParams,
        (r1, r2): (RouteIdx, RouteIdx),
        mut consumer: C,
    ) where
        C: FnMut(Self),
    {
        if r1 == r2 {
            return;
        }

        let from_route = solution.route(r1);
        let to_route = solution.route(r2);

        for from in 0..from_route.len() {
            for to in 0..=to_route.len() {
                consumer(InterRelocateOperator::new(InterRelocateParams {
                    from_route_id: r1,
                    to_route_id: r2,
                    from,
                    to,
                }));
            }
        }
    }

    fn delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        let from_route = solution.route(self.params.from_route_id);
        let to_route = solution.route(self.params.to_route_id);
        let v1 = from_route.vehicle_id();
        let v2 = to_route.vehicle_id();

        let a = from_route.previous_node(self.params.from);
        let b = from_route.node(self.params.from);
        let c = from_route.next_node(self.params.from);

        let removal_delta = if from_route.len() == 1 {
            -from_route.transport_costs(costs)
        } else {
            costs.arc_cost(v1, a, c) - costs.arc_cost(v1, a, b) - costs.arc_cost(v1, b, c)
        };

        let x = to_route.previous_node(self.params.to);
        let y = to_route.node_or_depot(self.params.to);

        let mut insertion_delta =
            costs.arc_cost(v2, x, b) + costs.arc_cost(v2, b, y) - costs.arc_cost(v2, x, y);
        if to_route.is_empty() {
            insertion_delta += costs.fixed_cost(v2);
        }

        removal_delta + insertion_delta
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let problem = solution.problem();
        let from_route = solution.route(self.params.from_route_id);
        let to_route = solution.route(self.params.to_route_id);
        let node = from_route.node(self.params.from);

        to_route.is_valid_change(problem, iter::once(node), self.params.to, self.params.to)
            && from_route.is_valid_change(problem, iter::empty(), self.params.from, self.params.from + 1)
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let node = solution.route(self.params.from_route_id).node(self.params.from);

        solution.replace_route_nodes(
            self.params.from_route_id,
            &[],
            self.params.from,
            self.params.from + 1,
        );
        solution.replace_route_nodes(self.params.to_route_id, &[node], self.params.to, self.params.to);
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.params.from_route_id, self.params.to_route_id]
    }
}
