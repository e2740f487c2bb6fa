use std::sync::Arc;

use tracing::{Level, debug, instrument};

use crate::{
    problem::{node::NodeIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        insertion::{EvaluatedInsertion, best_insertion},
        solution::working_solution::WorkingSolution,
    },
};

/// Cheapest insertion, required nodes first so that optional nodes never take the
/// room they need. Nodes without any feasible position stay unassigned.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn construct_solution(problem: Arc<VehicleRoutingProblem>) -> WorkingSolution {
    let mut solution = WorkingSolution::new(problem);

    insert_cheapest(&mut solution, |solution, node| {
        !solution.problem().node(node).is_optional()
    });

    if solution.problem().has_optional_nodes() {
        insert_cheapest(&mut solution, |solution, node| {
            solution.problem().node(node).is_optional()
        });
    }

    debug!(
        routes = solution.non_empty_routes_count(),
        unassigned = solution.unassigned().len(),
        score = %solution.score(),
        "Constructed initial solution"
    );

    solution
}

/// Repeatedly applies the globally cheapest insertion among the unassigned nodes
/// accepted by `filter`, ties go to the lowest node index.
fn insert_cheapest<F>(solution: &mut WorkingSolution, filter: F)
where
    F: Fn(&WorkingSolution, NodeIdx) -> bool,
{
    loop {
        let mut best: Option<EvaluatedInsertion> = None;

        for &node in solution.unassigned() {
            if !filter(solution, node) {
                continue;
            }

            if let Some(candidate) = best_insertion(solution.problem(), solution, node)
                && best
                    .as_ref()
                    .is_none_or(|current| candidate.cost < current.cost)
            {
                best = Some(candidate);
            }
        }

        match best {
            Some(best) => solution.insert(&best.insertion),
            None => break,
        }
    }
}
