use crate::solver::{
    arc_cost::ArcCost,
    ls::r#move::LocalSearchOperator,
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    solver_params::SolverParams,
};

/// **Inter-Route 2-Opt\***
///
/// Exchanges the tails of two routes, fixing routes that cross each other.
///
/// ```text
/// BEFORE:
///    R1: [Head A] --x--> [Tail A]
///                    \ /
///                     X
///                    / \
///    R2: [Head B] --x--> [Tail B]
///
/// AFTER:
///    R1: [Head A] -----> [Tail B]
///    R2: [Head B] -----> [Tail A]
/// ```
///
/// Tails keep their direction. A cut at position `i` keeps the nodes before `i` as head.
#[derive(Debug)]
pub struct InterTwoOptStarOperator {
    params: InterTwoOptStarOperatorParams,
}

#[derive(Debug)]
pub struct InterTwoOptStarOperatorParams {
    pub first_route_id: RouteIdx,
    pub second_route_id: RouteIdx,
    pub first_cut: usize,
    pub second_cut: usize,
}

impl InterTwoOptStarOperator {
    pub fn new(params: InterTwoOptStarOperatorParams) -> Self {
        if params.first_route_id == params.second_route_id {
            panic!("InterTwoOptStarOperator cannot be used for intra-route 2-Opt*");
        }

        InterTwoOptStarOperator { params }
    }
}

impl LocalSearchOperator for InterTwoOptStarOperator {
    fn generate_moves<C>(
        solution: &WorkingSolution,
        _params: &SolverParams,
        (r1, r2): (RouteIdx, RouteIdx),
        mut consumer: C,
    ) where
        C: FnMut(Self),
    {
        if r1 >= r2 {
            return;
        }

        let first_route = solution.route(r1);
        let second_route = solution.route(r2);

        for first_cut in 0..=first_route.len() {
            for second_cut in 0..=second_route.len() {
                // Both tails empty, nothing moves
                if first_cut == first_route.len() && second_cut == second_route.len() {
                    continue;
                }

                consumer(InterTwoOptStarOperator::new(
                    InterTwoOptStarOperatorParams {
                        first_route_id: r1,
                        second_route_id: r2,
                        first_cut,
                        second_cut,
                    },
                ));
            }
        }
    }

    fn delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        let first_route = solution.route(self.params.first_route_id);
        let second_route = solution.route(self.params.second_route_id);
        let v1 = first_route.vehicle_id();
        let v2 = second_route.vehicle_id();

        let (first_head, first_tail) = first_route.nodes().split_at(self.params.first_cut);
        let (second_head, second_tail) = second_route.nodes().split_at(self.params.second_cut);

        let new_first = costs.route_cost(
            v1,
            first_head.iter().chain(second_tail).copied(),
        );
        let new_second = costs.route_cost(
            v2,
            second_head.iter().chain(first_tail).copied(),
        );

        new_first + new_second
            - first_route.transport_costs(costs)
            - second_route.transport_costs(costs)
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let problem = solution.problem();
        let first_route = solution.route(self.params.first_route_id);
        let second_route = solution.route(self.params.second_route_id);

        let first_tail = &first_route.nodes()[self.params.first_cut..];
        let second_tail = &second_route.nodes()[self.params.second_cut..];

        first_route.is_valid_change(
            problem,
            second_tail.iter().copied(),
            self.params.first_cut,
            first_route.len(),
        ) && second_route.is_valid_change(
            problem,
            first_tail.iter().copied(),
            self.params.second_cut,
            second_route.len(),
        )
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let first_route = solution.route(self.params.first_route_id);
        let second_route = solution.route(self.params.second_route_id);

        let first_len = first_route.len();
        let second_len = second_route.len();
        let first_tail = first_route.nodes()[self.params.first_cut..].to_vec();
        let second_tail = second_route.nodes()[self.params.second_cut..].to_vec();

        solution.replace_route_nodes(
            self.params.first_route_id,
            &second_tail,
            self.params.first_cut,
            first_len,
        );
        solution.replace_route_nodes(
            self.params.second_route_id,
            &first_tail,
            self.params.second_cut,
            second_len,
        );
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.params.first_route_id, self.params.second_route_id]
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

    #[test]
    fn test_exchange_tails() {
        let problem = Arc::new(test_utils::create_line_problem(
            (0..4).map(|_| TestOrder::new(1.0, (0, 1440))).collect(),
            vec![100.0, 100.0],
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![vec![1, 4], vec![3, 2]],
        );

        let operator = InterTwoOptStarOperator::new(InterTwoOptStarOperatorParams {
            first_route_id: RouteIdx::new(0),
            second_route_id: RouteIdx::new(1),
            first_cut: 1,
            second_cut: 1,
        });

        let cost = solution.transport_costs(problem.as_ref());
        let delta = operator.delta(&solution, problem.as_ref());
        assert!(operator.is_valid(&solution));
        operator.apply(&mut solution);

        assert_eq!(solution.route(RouteIdx::new(0)).nodes(), &[1, 2].map(NodeIdx::new));
        assert_eq!(solution.route(RouteIdx::new(1)).nodes(), &[3, 4].map(NodeIdx::new));
        assert_eq!(solution.transport_costs(problem.as_ref()), cost + delta);
    }

    #[test]
    fn test_move_whole_tail_to_empty_route() {
        let problem = Arc::new(test_utils::create_line_problem(
            (0..3).map(|_| TestOrder::new(1.0, (0, 1440))).collect(),
            vec![100.0, 100.0],
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![vec![1, 2, 3], vec![]],
        );

        let operator = InterTwoOptStarOperator::new(InterTwoOptStarOperatorParams {
            first_route_id: RouteIdx::new(0),
            second_route_id: RouteIdx::new(1),
            first_cut: 2,
            second_cut: 0,
        });

        let cost = solution.transport_costs(problem.as_ref());
        let delta = operator.delta(&solution, problem.as_ref());
        operator.apply(&mut solution);

        assert_eq!(solution.route(RouteIdx::new(0)).nodes(), &[1, 2].map(NodeIdx::new));
        assert_eq!(solution.route(RouteIdx::new(1)).nodes(), &[3].map(NodeIdx::new));
        assert_eq!(solution.transport_costs(problem.as_ref()), cost + delta);
    }
}
