use jiff::SignedDuration;

use crate::problem::travel_cost_matrix::{Cost, Time};

pub const DEFAULT_WAITING_SLACK_MINUTES: Time = 30;
pub const DEFAULT_DROP_PENALTY: Cost = 1_000_000.0;
pub const DEFAULT_TIME_LIMIT: SignedDuration = SignedDuration::from_secs(20);
pub const DEFAULT_SEED: u64 = 2427121;

#[derive(Clone, Debug)]
pub struct SolverParams {
    pub terminations: Vec<Termination>,

    /// Seed of the random generator breaking ties between penalized arcs.
    pub seed: u64,

    /// Longest idle time allowed at a node before its window opens.
    pub waiting_slack_minutes: Time,

    /// Cost of leaving an optional node unvisited.
    pub drop_penalty: Cost,

    /// Scales the guided local search penalty weight relative to the average arc cost.
    pub gls_lambda_coefficient: f64,

    /// Longest segment moved by Or-opt.
    pub or_opt_max_segment: usize,

    /// Upper bound of improving moves applied per descent.
    pub max_descent_moves: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Termination {
    /// Wall-clock budget, a search stopped by it is not considered converged.
    Duration(SignedDuration),
    Iterations(usize),
    IterationsWithoutImprovement(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => (*num).max(1),
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            terminations: vec![
                Termination::IterationsWithoutImprovement(100),
                Termination::Iterations(1000),
                Termination::Duration(DEFAULT_TIME_LIMIT),
            ],
            seed: DEFAULT_SEED,
            waiting_slack_minutes: DEFAULT_WAITING_SLACK_MINUTES,
            drop_penalty: DEFAULT_DROP_PENALTY,
            gls_lambda_coefficient: 0.1,
            or_opt_max_segment: 3,
            max_descent_moves: 10_000,
        }
    }
}

impl SolverParams {
    /// Replaces the wall-clock budget, keeping the other terminations.
    pub fn with_time_limit(mut self, time_limit: SignedDuration) -> Self {
        self.terminations
            .retain(|termination| !matches!(termination, Termination::Duration(_)));
        self.terminations.push(Termination::Duration(time_limit));
        self
    }

    pub fn time_limit(&self) -> Option<SignedDuration> {
        self.terminations.iter().find_map(|termination| match termination {
            Termination::Duration(duration) => Some(*duration),
            _ => None,
        })
    }
}
