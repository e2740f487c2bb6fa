use crate::solver::{
    arc_cost::ArcCost,
    ls::r#move::LocalSearchOperator,
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    solver_params::SolverParams,
};

#[derive(Debug)]
pub struct RelocateOperator {
    params: RelocateOperatorParams,
}

#[derive(Debug)]
pub struct RelocateOperatorParams {
    pub route_id: RouteIdx,
    pub from: usize,
    /// Insertion position in the current route, before the node is removed
    pub to: usize,
}

impl RelocateOperator {
    pub fn new(params: RelocateOperatorParams) -> Self {
        if params.from == params.to || params.from + 1 == params.to {
            panic!("RelocateOperator 'from' and 'to' positions must be different");
        }

        Self { params }
    }

    /// Positions of the nodes replacing the changed range, with that range.
    fn replacement(&self) -> (Vec<usize>, usize, usize) {
        let RelocateOperatorParams { from, to, .. } = self.params;

        // A - B - C - D - E, moving B before E gives C - D - B in place of B - C - D
        if from < to {
            ((from + 1..to).chain(std::iter::once(from)).collect(), from, to)
        } else {
            // Moving D before B gives D - B - C in place of B - C - D
            (std::iter::once(from).chain(to..from).collect(), to, from + 1)
        }
    }
}

impl LocalSearchOperator for RelocateOperator {
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

        for from in 0..route.len() {
            for to in 0..=route.len() {
                if from == to || from + 1 == to {
                    continue;
                }

                consumer(RelocateOperator::new(RelocateOperatorParams {
                    route_id: r1,
                    from,
                    to,
                }));
            }
        }
    }

    fn delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        let route = solution.route(self.params.route_id);
        let vehicle = route.vehicle_id();

        let a = route.previous_node(self.params.from);
        let b = route.node(self.params.from);
        let c = route.next_node(self.params.from);

        let x = route.previous_node(self.params.to);
        let y = route.node_or_depot(self.params.to);

        let current_cost = costs.arc_cost(vehicle, a, b)
            + costs.arc_cost(vehicle, b, c)
            + costs.arc_cost(vehicle, x, y);

        let new_cost = costs.arc_cost(vehicle, a, c)
            + costs.arc_cost(vehicle, x, b)
            + costs.arc_cost(vehicle, b, y);

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

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::node::NodeIdx,
        test_utils::{self, TestOrder},
    };

    use super::*;

    fn open_orders(count: usize) -> Vec<TestOrder> {
        (0..count).map(|_| TestOrder::new(1.0, (0, 1440))).collect()
    }

    #[test]
    fn test_relocate_forward() {
        let problem = Arc::new(test_utils::create_line_problem(open_orders(5), vec![100.0]));
        let mut solution =
            test_utils::create_test_working_solution(Arc::clone(&problem), vec![vec![1, 4, 2, 3, 5]]);

        let operator = RelocateOperator::new(RelocateOperatorParams {
            route_id: RouteIdx::new(0),
            from: 1,
            to: 4,
        });

        let cost = solution.transport_costs(problem.as_ref());
        let delta = operator.delta(&solution, problem.as_ref());
        assert!(operator.is_valid(&solution));
        operator.apply(&mut solution);

        assert_eq!(
            solution.route(RouteIdx::new(0)).nodes(),
            &[1, 2, 3, 4, 5].map(NodeIdx::new)
        );
        assert_eq!(solution.transport_costs(problem.as_ref()), cost + delta);
        assert!(delta < 0.0);
    }

    #[test]
    fn test_relocate_backward() {
        let problem = Arc::new(test_utils::create_line_problem(open_orders(4), vec![100.0]));
        let mut solution =
            test_utils::create_test_working_solution(Arc::clone(&problem), vec![vec![2, 3, 1, 4]]);

        let operator = RelocateOperator::new(RelocateOperatorParams {
            route_id: RouteIdx::new(0),
            from: 2,
            to: 0,
        });

        let cost = solution.transport_costs(problem.as_ref());
        let delta = operator.delta(&solution, problem.as_ref());
        operator.apply(&mut solution);

        assert_eq!(
            solution.route(RouteIdx::new(0)).nodes(),
            &[1, 2, 3, 4].map(NodeIdx::new)
        );
        assert_eq!(solution.transport_costs(problem.as_ref()), cost + delta);
    }

    #[test]
    fn test_relocate_respects_time_windows() {
        let problem = Arc::new(test_utils::create_line_problem(
            vec![
                TestOrder::new(1.0, (0, 1440)).with_service_time(15),
                TestOrder::new(1.0, (0, 30)),
            ],
            vec![100.0],
        ));
        let solution =
            test_utils::create_test_working_solution(Arc::clone(&problem), vec![vec![2, 1]]);

        // Serving node 2 second misses its window
        let operator = RelocateOperator::new(RelocateOperatorParams {
            route_id: RouteIdx::new(0),
            from: 0,
            to: 2,
        });

        assert!(!operator.is_valid(&solution));
    }
}
