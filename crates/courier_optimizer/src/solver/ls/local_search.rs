use fxhash::FxHashSet;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{Level, instrument, trace};

use crate::solver::{
    arc_cost::ArcCost,
    ls::{
        insert::InsertOperator,
        inter_relocate::InterRelocateOperator,
        inter_swap::InterSwapOperator,
        inter_two_opt_star::InterTwoOptStarOperator,
        r#move::{LocalSearchMove, LocalSearchOperator},
        or_opt::OrOptOperator,
        relocate::RelocateOperator,
        swap::SwapOperator,
        two_opt::TwoOptOperator,
    },
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    solver_params::SolverParams,
};

type RoutePair = (RouteIdx, RouteIdx);

/// Moves must improve by more than this to be applied.
const MIN_IMPROVEMENT: f64 = 1e-9;

/// Best-improvement descent over route pairs.
///
/// The best move of every pair is cached and only the pairs touching a changed
/// route are evaluated again after a move.
pub struct LocalSearch {
    num_routes: usize,
    pairs: Vec<RoutePair>,
    best_moves: Vec<Option<(f64, LocalSearchMove)>>,
}

impl LocalSearch {
    pub fn new(num_routes: usize) -> Self {
        LocalSearch {
            num_routes,
            pairs: Vec::with_capacity(num_routes * num_routes),
            best_moves: (0..num_routes * num_routes).map(|_| None).collect(),
        }
    }

    /// Applies improving moves under `costs` until none is left or the move budget
    /// is spent, returns the number of moves applied.
    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn descend<A>(
        &mut self,
        solution: &mut WorkingSolution,
        costs: &A,
        params: &SolverParams,
    ) -> usize
    where
        A: ArcCost + Sync,
    {
        self.build_pairs();

        let mut applied = 0;
        while applied < params.max_descent_moves && self.run_iteration(solution, costs, params) {
            applied += 1;
        }

        applied
    }

    fn run_iteration<A>(
        &mut self,
        solution: &mut WorkingSolution,
        costs: &A,
        params: &SolverParams,
    ) -> bool
    where
        A: ArcCost + Sync,
    {
        let results = {
            let solution = &*solution;
            self.pairs
                .par_iter()
                .map(|&pair| (pair, find_best_move(solution, costs, params, pair)))
                .collect::<Vec<_>>()
        };

        for ((r1, r2), best_move) in results {
            let index = self.index(r1, r2);
            self.best_moves[index] = best_move;
        }

        let mut best: Option<(usize, f64)> = None;
        for (index, entry) in self.best_moves.iter().enumerate() {
            if let Some((delta, _)) = entry
                && best.is_none_or(|(_, best_delta)| *delta < best_delta)
            {
                best = Some((index, *delta));
            }
        }

        let Some((index, delta)) = best else {
            return false;
        };

        let Some((_, op)) = self.best_moves[index].take() else {
            return false;
        };

        trace!(operator = op.operator_name(), delta, "Apply move");
        op.apply(solution);

        self.update_pairs(&op);

        true
    }

    fn build_pairs(&mut self) {
        self.pairs.clear();
        for i in 0..self.num_routes {
            for j in 0..self.num_routes {
                self.pairs.push((RouteIdx::new(i), RouteIdx::new(j)));
            }
        }
        self.best_moves.iter_mut().for_each(|entry| *entry = None);
    }

    fn update_pairs(&mut self, op: &LocalSearchMove) {
        let mut pairs = FxHashSet::default();

        for updated_route in op.updated_routes() {
            for i in 0..self.num_routes {
                pairs.insert((RouteIdx::new(i), updated_route));
                pairs.insert((updated_route, RouteIdx::new(i)));
            }
        }

        // The set of unassigned nodes changed, every cached insertion is stale
        if matches!(op, LocalSearchMove::Insert(_)) {
            for i in 0..self.num_routes {
                pairs.insert((RouteIdx::new(i), RouteIdx::new(i)));
            }
        }

        for &(r1, r2) in &pairs {
            let index = self.index(r1, r2);
            self.best_moves[index] = None;
        }

        self.pairs.clear();
        self.pairs.extend(pairs);
        self.pairs.sort_unstable();
    }

    #[inline]
    fn index(&self, r1: RouteIdx, r2: RouteIdx) -> usize {
        r1.get() * self.num_routes + r2.get()
    }
}

fn find_best_move<A: ArcCost>(
    solution: &WorkingSolution,
    costs: &A,
    params: &SolverParams,
    pair: RoutePair,
) -> Option<(f64, LocalSearchMove)> {
    let mut best_delta = -MIN_IMPROVEMENT;
    let mut best_move: Option<LocalSearchMove> = None;

    RelocateOperator::generate_moves(solution, params, pair, |op| {
        let delta = op.delta(solution, costs);
        if delta < best_delta && op.is_valid(solution) {
            best_delta = delta;
            best_move = Some(LocalSearchMove::Relocate(op));
        }
    });

    TwoOptOperator::generate_moves(solution, params, pair, |op| {
        let delta = op.delta(solution, costs);
        if delta < best_delta && op.is_valid(solution) {
            best_delta = delta;
            best_move = Some(LocalSearchMove::TwoOpt(op));
        }
    });

    SwapOperator::generate_moves(solution, params, pair, |op| {
        let delta = op.delta(solution, costs);
        if delta < best_delta && op.is_valid(solution) {
            best_delta = delta;
            best_move = Some(LocalSearchMove::Swap(op));
        }
    });

    OrOptOperator::generate_moves(solution, params, pair, |op| {
        let delta = op.delta(solution, costs);
        if delta < best_delta && op.is_valid(solution) {
            best_delta = delta;
            best_move = Some(LocalSearchMove::OrOpt(op));
        }
    });

    InterRelocateOperator::generate_moves(solution, params, pair, |op| {
        let delta = op.delta(solution, costs);
        if delta < best_delta && op.is_valid(solution) {
            best_delta = delta;
            best_move = Some(LocalSearchMove::InterRelocate(op));
        }
    });

    InterSwapOperator::generate_moves(solution, params, pair, |op| {
        let delta = op.delta(solution, costs);
        if delta < best_delta && op.is_valid(solution) {
            best_delta = delta;
            best_move = Some(LocalSearchMove::InterSwap(op));
        }
    });

    InterTwoOptStarOperator::generate_moves(solution, params, pair, |op| {
        let delta = op.delta(solution, costs);
        if delta < best_delta && op.is_valid(solution) {
            best_delta = delta;
            best_move = Some(LocalSearchMove::InterTwoOptStar(op));
        }
    });

    InsertOperator::generate_moves(solution, params, pair, |op| {
        let delta = op.delta(solution, costs);
        if delta < best_delta && op.is_valid(solution) {
            best_delta = delta;
            best_move = Some(LocalSearchMove::Insert(op));
        }
    });

    best_move.map(|op| (best_delta, op))
}
