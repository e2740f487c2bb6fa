use crate::solver::{
    arc_cost::ArcCost,
    ls::r#move::LocalSearchOperator,
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    solver_params::SolverParams,
};

/// Moves the chain `[from, from + length)` before position `to` of the same route,
/// keeping its direction.
#[derive(Debug)]
pub struct OrOptOperator {
    params: OrOptOperatorParams,
}

#[derive(Debug)]
pub struct OrOptOperatorParams {
    pub route_id: RouteIdx,
    pub from: usize,
    pub length: usize,
    /// Insertion position in the current route
    pub to: usize,
}

impl OrOptOperator {
    pub fn new(params: OrOptOperatorParams) -> Self {
        if params.to >= params.from && params.to <= params.from + params.length {
            panic!("OrOptOperator: 'to' cannot fall inside the moved chain");
        }

        OrOptOperator { params }
    }

    /// Positions of the nodes replacing the changed range, with that range.
    fn replacement(&self) -> (Vec<usize>, usize, usize) {
        let OrOptOperatorParams {
            from, length, to, ..
        } = self.params;
        let chain = from..from + length;

        if to > from + length {
            ((from + length..to).chain(chain).collect(), from, to)
        } else {
            (chain.chain(to..from).collect(), to, from + length)
        }
    }
}

impl LocalSearchOperator for OrOptOperator {
    fn generate_moves<C>(
        solution: &WorkingSolution,
        params: &SolverParams,
        (r1, r2): (RouteIdx, RouteIdx),
        mut consumer: C,
    ) where
        C: FnMut(Self),
    {
        if r1 != r2 {
            return;
        }

        let route = solution.route(r1);

        // Single nodes are handled by relocate
        for length in 2..=params.or_opt_max_segment {
            if length >= route.len() {
                break;
            }

            for from in 0..=(route.len() - length) {
                for to in 0..=route.len() {
                    if to >= from && to <= from + length {
                        continue;
                    }

                    consumer(OrOptOperator::new(OrOptOperatorParams {
                        route_id: r1,
                        from,
                        length,
                        to,
                    }));
                }
            }
        }
    }

    fn delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        let route = solution.route(self.params.route_id);
        let vehicle = route.vehicle_id();
        let OrOptOperatorParams {
            from, length, to, ..
        } = self.params;

        let a = route.previous_node(from);
        let first = route.node(from);
        let last = route.node(from + length - 1);
        let b = route.node_or_depot(from + length);

        let x = route.previous_node(to);
        let y = route.node_or_depot(to);

        let current_cost = costs.arc_cost(vehicle, a, first)
            + costs.arc_cost(vehicle, last, b)
            + costs.arc_cost(vehicle, x, y);

        let new_cost = costs.arc_cost(vehicle, a, b)
            + costs.arc_cost(vehicle, x, first)
            + costs.arc_cost(vehicle, last, y);

        new_cost - current_cost
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let route = solution.route(self.params.route_id);
        let (positions, start, end) = self.replacement();

        route.is_valid_change(
            solution.problem(),
            positions.into_iter().map(|position| route.node(position)),
            start,
            end,
        )
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let route = solution.route(self.params.route_id);
        let (positions, start, end) = self.replacement();
        let nodes = positions
            .into_iter()
            .map(|position| route.node(position))
            .collect::<Vec<_>>();

        solution.replace_route_nodes(self.params.route_id, &nodes, start, end);
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.params.route_id]
    }
}
