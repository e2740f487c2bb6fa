use crate::solver::{
    arc_cost::ArcCost,
    ls::{
        insert::InsertOperator, inter_relocate::InterRelocateOperator,
        inter_swap::InterSwapOperator, inter_two_opt_star::InterTwoOptStarOperator,
        or_opt::OrOptOperator, relocate::RelocateOperator, swap::SwapOperator,
        two_opt::TwoOptOperator,
    },
    solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    solver_params::SolverParams,
};

pub trait LocalSearchOperator: Sized {
    /// Calls `consumer` with every move of this kind between the two routes,
    /// `r1 == r2` for intra-route moves.
    fn generate_moves<C>(
        solution: &WorkingSolution,
        params: &SolverParams,
        pair: (RouteIdx, RouteIdx),
        consumer: C,
    ) where
        C: FnMut(Self);

    /// Change of the solution cost under `costs`, negative when improving.
    fn delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64;

    fn is_valid(&self, solution: &WorkingSolution) -> bool;

    fn apply(&self, solution: &mut WorkingSolution);

    fn updated_routes(&self) -> Vec<RouteIdx>;
}

#[derive(Debug)]
pub enum LocalSearchMove {
    /// Moves a node to another position of the same route.
    Relocate(RelocateOperator),
    /// Reverses a segment of a route.
    TwoOpt(TwoOptOperator),
    /// Exchanges two nodes of the same route.
    Swap(SwapOperator),
    /// Moves a chain of consecutive nodes within the same route.
    OrOpt(OrOptOperator),
    /// Moves a node to another route.
    InterRelocate(InterRelocateOperator),
    /// Exchanges two nodes between routes.
    InterSwap(InterSwapOperator),
    /// Exchanges the tails of two routes.
    InterTwoOptStar(InterTwoOptStarOperator),
    /// Serves a node that was left unassigned.
    Insert(InsertOperator),
}

impl LocalSearchMove {
    pub fn operator_name(&self) -> &'static str {
        match self {
            LocalSearchMove::Relocate(_) => "Relocate",
            LocalSearchMove::TwoOpt(_) => "Two-Opt",
            LocalSearchMove::Swap(_) => "Swap",
            LocalSearchMove::OrOpt(_) => "Or-Opt",
            LocalSearchMove::InterRelocate(_) => "Inter-Relocate",
            LocalSearchMove::InterSwap(_) => "Inter-Swap",
            LocalSearchMove::InterTwoOptStar(_) => "Inter-2-Opt*",
            LocalSearchMove::Insert(_) => "Insert",
        }
    }

    pub fn delta<A: ArcCost>(&self, solution: &WorkingSolution, costs: &A) -> f64 {
        match self {
            LocalSearchMove::Relocate(op) => op.delta(solution, costs),
            LocalSearchMove::TwoOpt(op) => op.delta(solution, costs),
            LocalSearchMove::Swap(op) => op.delta(solution, costs),
            LocalSearchMove::OrOpt(op) => op.delta(solution, costs),
            LocalSearchMove::InterRelocate(op) => op.delta(solution, costs),
            LocalSearchMove::InterSwap(op) => op.delta(solution, costs),
            LocalSearchMove::InterTwoOptStar(op) => op.delta(solution, costs),
            LocalSearchMove::Insert(op) => op.delta(solution, costs),
        }
    }

    pub fn is_valid(&self, solution: &WorkingSolution) -> bool {
        match self {
            LocalSearchMove::Relocate(op) => op.is_valid(solution),
            LocalSearchMove::TwoOpt(op) => op.is_valid(solution),
            LocalSearchMove::Swap(op) => op.is_valid(solution),
            LocalSearchMove::OrOpt(op) => op.is_valid(solution),
            LocalSearchMove::InterRelocate(op) => op.is_valid(solution),
            LocalSearchMove::InterSwap(op) => op.is_valid(solution),
            LocalSearchMove::InterTwoOptStar(op) => op.is_valid(solution),
            LocalSearchMove::Insert(op) => op.is_valid(solution),
        }
    }

    pub fn apply(&self, solution: &mut WorkingSolution) {
        match self {
            LocalSearchMove::Relocate(op) => op.apply(solution),
            LocalSearchMove::TwoOpt(op) => op.apply(solution),
            LocalSearchMove::Swap(op) => op.apply(solution),
            LocalSearchMove::OrOpt(op) => op.apply(solution),
            LocalSearchMove::InterRelocate(op) => op.apply(solution),
            LocalSearchMove::InterSwap(op) => op.apply(solution),
            LocalSearchMove::InterTwoOptStar(op) => op.apply(solution),
            LocalSearchMove::Insert(op) => op.apply(solution),
        }
    }

    pub fn updated_routes(&self) -> Vec<RouteIdx> {
        match self {
            LocalSearchMove::Relocate(op) => op.updated_routes(),
            LocalSearchMove::TwoOpt(op) => op.updated_routes(),
            LocalSearchMove::Swap(op) => op.updated_routes(),
            LocalSearchMove::OrOpt(op) => op.updated_routes(),
            LocalSearchMove::InterRelocate(op) => op.updated_routes(),
            LocalSearchMove::InterSwap(op) => op.updated_routes(),
            LocalSearchMove::InterTwoOptStar(op) => op.updated_routes(),
            LocalSearchMove::Insert(op) => op.updated_routes(),
        }
    }
}
