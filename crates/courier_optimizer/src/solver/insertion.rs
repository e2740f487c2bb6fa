use crate::{
    problem::node::NodeIdx,
    solver::{
        arc_cost::ArcCost,
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

#[derive(Clone, Debug, PartialEq)]
pub struct Insertion {
    pub route_id: RouteIdx,
    /// Position of the node once inserted
    pub position: usize,
    pub node: NodeIdx,
}

/// Feasible insertion with its objective delta.
#[derive(Clone, Debug)]
pub struct EvaluatedInsertion {
    pub insertion: Insertion,
    pub cost: f64,
}

/// Objective delta of inserting `node` at `position`, including the fixed cost of
/// opening an empty route.
pub fn insertion_cost<C: ArcCost>(
    costs: &C,
    solution: &WorkingSolution,
    route_id: RouteIdx,
    position: usize,
    node: NodeIdx,
) -> f64 {
    let route = solution.route(route_id);
    let vehicle = route.vehicle_id();
    let previous = route.previous_node(position);
    let next = route.node_or_depot(position);

    let delta = costs.arc_cost(vehicle, previous, node) + costs.arc_cost(vehicle, node, next)
        - costs.arc_cost(vehicle, previous, next);

    if route.is_empty() {
        delta + costs.fixed_cost(vehicle)
    } else {
        delta
    }
}

/// Calls `f` for every feasible position of `node`, routes and positions in increasing order.
pub fn for_each_insertion(
    solution: &WorkingSolution,
    node: NodeIdx,
    mut f: impl FnMut(Insertion),
) {
    let problem = solution.problem();
    for route_id in solution.route_ids() {
        let route = solution.route(route_id);
        for position in 0..=route.len() {
            if route.is_valid_change(problem, std::iter::once(node), position, position) {
                f(Insertion {
                    route_id,
                    position,
                    node,
                });
            }
        }
    }
}

/// Cheapest feasible insertion of `node`, the first one found wins ties.
pub fn best_insertion<C: ArcCost>(
    costs: &C,
    solution: &WorkingSolution,
    node: NodeIdx,
) -> Option<EvaluatedInsertion> {
    let mut best: Option<EvaluatedInsertion> = None;

    for_each_insertion(solution, node, |insertion| {
        let cost = insertion_cost(
            costs,
            solution,
            insertion.route_id,
            insertion.position,
            insertion.node,
        );

        if best.as_ref().is_none_or(|current| cost < current.cost) {
            best = Some(EvaluatedInsertion { insertion, cost });
        }
    });

    best
}
