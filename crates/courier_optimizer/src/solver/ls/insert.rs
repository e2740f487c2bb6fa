use std::iter;

use crate::{
    problem::node::NodeIdx,
    solver::{
        arc_cost::ArcCost,
        insertion::{Insertion, insertion_cost},
        ls::r#move::LocalSearchOperator,
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
        solver_params::SolverParams,
    },
};

/// Serves an unassigned node, the delta includes the drop penalty saved.
/// Required nodes left out by the construction are picked up here as well.
#[derive(Debug)]
pub struct InsertOperator {
    insertion: Insertion,
}

impl InsertOperator {
    pub fn new(insertion: Insertion) -> Self {
        InsertOperator { insertion }
    }
}

impl LocalSearchOperator for InsertOperator {
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
        for &node in solution.unassigned() {
            for position in 0..=route.len() {
                consumer(InsertOperator::new(Insertion {
                    route_id: r1,
                    position,
                    node,
                }));
            }
        }
    }

    fn delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        let Insertion {
            route_id,
            position,
            node,
        } = self.insertion;

        insertion_cost(costs, solution, route_id, position, node) - drop_cost(solution, node)
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        solution.route(self.insertion.route_id).is_valid_change(
            solution.problem(),
            iter::once(self.insertion.node),
            self.insertion.position,
            self.insertion.position,
        )
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        solution.insert(&self.insertion);
    }

    fn updated_routes(&self) -> Vec<RouteIdx> {
        vec![self.insertion.route_id]
    }
}

/// Serving a required node must outweigh any soft saving, it lowers the hard score.
const REQUIRED_NODE_WEIGHT: f64 = 1e12;

/// Cost saved by serving `node`.
fn drop_cost(solution: &WorkingSolution, node: NodeIdx) -> f64 {
    if solution.problem().node(node).is_optional() {
        solution.problem().drop_penalty()
    } else {
        REQUIRED_NODE_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::constraint_set::ConstraintSet,
        test_utils::{self, TestOrder},
    };

    use super::*;

    #[test]
    fn test_insert_dropped_node() {
        let problem = Arc::new(test_utils::create_line_problem_with_constraints(
            vec![TestOrder::new(1.0, (0, 1440)), TestOrder::new(1.0, (0, 1440))],
            vec![100.0],
            ConstraintSet {
                excluded_order_ids: vec![String::from("O2")],
                ..ConstraintSet::default()
            },
        ));
        let mut solution =
            test_utils::create_test_working_solution(Arc::clone(&problem), vec![vec![1]]);

        let operator = InsertOperator::new(Insertion {
            route_id: RouteIdx::new(0),
            position: 1,
            node: NodeIdx::new(2),
        });

        let score = solution.score();
        let delta = operator.delta(&solution, problem.as_ref());
        assert!(operator.is_valid(&solution));
        operator.apply(&mut solution);

        assert_eq!(delta, 20.0 - problem.drop_penalty());
        assert_eq!(solution.score().soft_score, score.soft_score + delta);
        assert!(solution.unassigned().is_empty());
    }

    #[test]
    fn test_required_node_outranks_cost() {
        let problem = Arc::new(test_utils::create_line_problem(
            vec![TestOrder::new(1.0, (0, 1440)), TestOrder::new(1.0, (0, 1440))],
            vec![100.0],
        ));
        let solution =
            test_utils::create_test_working_solution(Arc::clone(&problem), vec![vec![1]]);
        assert_eq!(solution.score().hard_score, 1.0);

        let operator = InsertOperator::new(Insertion {
            route_id: RouteIdx::new(0),
            position: 1,
            node: NodeIdx::new(2),
        });

        assert!(operator.delta(&solution, problem.as_ref()) < -problem.drop_penalty());
    }
}
