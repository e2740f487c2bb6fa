use std::iter;

use crate::solver::{
    arc_cost::ArcCost,
    ls::r#move::LocalSearchOperator,
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    solver_params::SolverParams,
};

/// Reverses the segment `[from, to]` of a route.
///
/// ```text
/// ... (prev) --x--> [from] -> ... -> [to] --x--> (next) ...
/// ... (prev) -----> [to] -> ... -> [from] -----> (next) ...
/// ```
#[derive(Debug)]
pub struct TwoOptOperator {
    params: TwoOptParams,
}

#[derive(Debug)]
pub struct TwoOptParams {
    pub route_id: RouteIdx,
    pub from: usize,
    pub to: usize,
}

impl TwoOptOperator {
    pub fn new(params: TwoOptParams) -> Self {
        if params.from >= params.to {
            panic!("TwoOpt: cannot have from >= to")
        }

        TwoOptOperator { params }
    }

    fn symmetric_delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        let route = solution.route(self.params.route_id);
        let vehicle = route.vehicle_id();

        let prev = route.previous_node(self.params.from);
        let from = route.node(self.params.from);
        let to = route.node(self.params.to);
        let next = route.next_node(self.params.to);

        let current_cost = costs.arc_cost(vehicle, prev, from) + costs.arc_cost(vehicle, to, next);
        let new_cost = costs.arc_cost(vehicle, prev, to) + costs.arc_cost(vehicle, from, next);

        new_cost - current_cost
    }

    // Reversal changes every inner arc when the costs are directed
    fn asymmetric_delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        let route = solution.route(self.params.route_id);
        let vehicle = route.vehicle_id();

        let prev = route.previous_node(self.params.from);
        let next = route.next_node(self.params.to);
        let segment = &route.nodes()[self.params.from..=self.params.to];

        let current_cost = costs.path_cost(
            vehicle,
            iter::once(prev)
                .chain(segment.iter().copied())
                .chain(iter::once(next)),
        );
        let new_cost = costs.path_cost(
            vehicle,
            iter::once(prev)
                .chain(segment.iter().rev().copied())
                .chain(iter::once(next)),
        );

        new_cost - current_cost
    }
}

impl LocalSearchOperator for TwoOptOperator {
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

        // Reversing two adjacent nodes is a swap
        if route.len() < 3 {
            return;
        }

        for from in 0..route.len() - 2 {
            for to in (from + 2)..route.len() {
                consumer(TwoOptOperator::new(TwoOptParams {
                    route_id: r1,
                    from,
                    to,
                }));
            }
        }
    }

    fn delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        if solution.problem().is_symmetric() {
            self.symmetric_delta(solution, costs)
        } else {
            self.asymmetric_delta(solution, costs)
        }
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let route = solution.route(self.params.route_id);

        route.is_valid_change(
            solution.problem(),
            route.nodes()[self.params.from..=self.params.to]
                .iter()
                .rev()
                .copied(),
            self.params.from,
            self.params.to + 1,
        )
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let mut reversed = solution.route(self.params.route_id).nodes()
            [self.params.from..=self.params.to]
            .to_vec();
        reversed.reverse();

        solution.replace_route_nodes(
            self.params.route_id,
            &reversed,
            self.params.from,
            self.params.to + 1,
        );
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.params.route_id]
    }
}
