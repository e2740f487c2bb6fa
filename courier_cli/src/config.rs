use clap::Args;
use courier_matrix_providers::travel_matrix_provider::TravelMatrixProvider;
use courier_optimizer::{
    engine::EngineConfig,
    solver::solver_params::{SolverParams, Threads},
};
use tracing::debug;

use crate::parsers;

/// Engine settings shared by every command, flags win over the environment.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Wall-clock budget per solve (e.g. "30s", "PT1M", "45")
    #[arg(long, global = true, env = "COURIER_TIME_LIMIT", value_parser = parsers::parse_duration)]
    time_limit: Option<jiff::SignedDuration>,

    /// Scenarios solved at the same time, "auto" or a number
    #[arg(long, global = true, env = "COURIER_THREADS", value_parser = parsers::parse_threads)]
    threads: Option<Threads>,

    #[arg(long, global = true, env = "COURIER_SEED")]
    seed: Option<u64>,

    /// planar, grid or road_network
    #[arg(long, global = true, env = "COURIER_DISTANCE_METRIC", value_parser = parsers::parse_metric)]
    distance_metric: Option<TravelMatrixProvider>,
}

impl ConfigArgs {
    pub fn engine_config(&self) -> EngineConfig {
        let mut solver = SolverParams::default();
        if let Some(seed) = self.seed {
            solver.seed = seed;
        }
        if let Some(time_limit) = self.time_limit {
            solver = solver.with_time_limit(time_limit);
        }

        let config = EngineConfig {
            solver,
            parallelism: self.threads.clone().unwrap_or(Threads::Auto),
            matrix_provider: self.distance_metric.clone().unwrap_or_default(),
            ..EngineConfig::default()
        };

        debug!(?config, "Engine configuration");
        config
    }
}
