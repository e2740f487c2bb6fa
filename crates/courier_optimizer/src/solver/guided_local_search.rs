use std::sync::Arc;

use jiff::Timestamp;
use rand::{SeedableRng, rngs::SmallRng, seq::IndexedRandom};
use tracing::{Level, debug, info, instrument};

use crate::{
    problem::{
        node::{DEPOT, NodeIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        arc_cost::{ArcCost, ArcPenalties, PenalizedArcCost},
        ls::local_search::LocalSearch,
        score::Score,
        solution::working_solution::WorkingSolution,
        solver_params::{SolverParams, Termination},
    },
};

/// Result of a guided local search run.
pub struct SearchOutcome {
    pub solution: WorkingSolution,
    pub score: Score,
    pub iterations: usize,
    /// False when the wall-clock budget stopped the search.
    pub converged: bool,
}

struct SearchState {
    start: Timestamp,
    iteration: usize,
    iterations_without_improvement: usize,
}

/// Guided local search: at every local optimum, penalize the arc with the highest
/// `cost / (1 + penalty)` and descend again on the augmented costs.
pub struct GuidedLocalSearch {
    problem: Arc<VehicleRoutingProblem>,
    params: SolverParams,
}

impl GuidedLocalSearch {
    pub fn new(problem: Arc<VehicleRoutingProblem>, params: SolverParams) -> Self {
        GuidedLocalSearch { problem, params }
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn run(&self, initial: WorkingSolution) -> SearchOutcome {
        let problem = self.problem.as_ref();
        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let mut state = SearchState {
            start: Timestamp::now(),
            iteration: 0,
            iterations_without_improvement: 0,
        };

        let mut local_search = LocalSearch::new(initial.routes().len());
        let mut current = initial;
        local_search.descend(&mut current, problem, &self.params);

        let mut best = current.clone();
        let mut best_score = best.score();

        let num_arcs = count_arcs(&current);
        if num_arcs == 0 {
            return SearchOutcome {
                solution: best,
                score: best_score,
                iterations: 0,
                converged: true,
            };
        }

        let lambda = self.params.gls_lambda_coefficient * current.transport_costs(problem)
            / num_arcs as f64;
        let mut penalties = ArcPenalties::new(problem.num_nodes());

        debug!(lambda, score = %best_score, "Starting guided local search");

        let converged = loop {
            if let Some(termination) = self.reached_termination(&state) {
                break !matches!(termination, Termination::Duration(_));
            }

            let Some((from, to)) = select_arc_to_penalize(&current, &penalties, &mut rng) else {
                break true;
            };
            penalties.penalize(from, to);

            let costs = PenalizedArcCost::new(problem, &penalties, lambda);
            local_search.descend(&mut current, &costs, &self.params);

            state.iteration += 1;

            let score = current.score();
            if score.improves_on(&best_score) {
                debug!(iteration = state.iteration, %score, "New best solution");
                best = current.clone();
                best_score = score;
                state.iterations_without_improvement = 0;
            } else {
                state.iterations_without_improvement += 1;
            }
        };

        info!(
            iterations = state.iteration,
            penalties = penalties.total(),
            converged,
            score = %best_score,
            "Guided local search finished"
        );

        SearchOutcome {
            solution: best,
            score: best_score,
            iterations: state.iteration,
            converged,
        }
    }

    fn reached_termination(&self, state: &SearchState) -> Option<&Termination> {
        self.params
            .terminations
            .iter()
            .find(|termination| check_termination(state, termination))
    }
}

fn check_termination(state: &SearchState, termination: &Termination) -> bool {
    match *termination {
        Termination::Iterations(max_iterations) => state.iteration >= max_iterations,
        Termination::Duration(max_duration) => {
            Timestamp::now().duration_since(state.start) > max_duration
        }
        Termination::IterationsWithoutImprovement(max_iterations_without_improvement) => {
            state.iterations_without_improvement >= max_iterations_without_improvement
        }
    }
}

fn count_arcs(solution: &WorkingSolution) -> usize {
    solution
        .non_empty_routes_iter()
        .map(|route| route.len() + 1)
        .sum()
}

/// Arc of the current solution with the highest utility, ties broken at random.
fn select_arc_to_penalize(
    solution: &WorkingSolution,
    penalties: &ArcPenalties,
    rng: &mut SmallRng,
) -> Option<(NodeIdx, NodeIdx)> {
    let problem = solution.problem();
    let mut best_utility = f64::NEG_INFINITY;
    let mut candidates = Vec::new();

    for route in solution.non_empty_routes_iter() {
        let vehicle = route.vehicle_id();
        let mut previous = DEPOT;

        for &node in route.nodes().iter().chain(std::iter::once(&DEPOT)) {
            let utility = problem.arc_cost(vehicle, previous, node)
                / (1.0 + penalties.get(previous, node) as f64);

            if utility > best_utility + 1e-12 {
                best_utility = utility;
                candidates.clear();
                candidates.push((previous, node));
            } else if (utility - best_utility).abs() <= 1e-12 {
                candidates.push((previous, node));
            }

            previous = node;
        }
    }

    candidates.choose(rng).copied()
}
