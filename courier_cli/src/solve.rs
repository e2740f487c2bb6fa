use std::path::PathBuf;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use courier_matrix_providers::{cache::MemoryMatricesCache, travel_matrix_client::TravelMatrixClient};
use courier_optimizer::{
    engine::{self, EngineConfig},
    json::types::JsonSolveRequest,
    solution_set::SolutionSet,
};
use tracing::info;

use crate::file_utils;

#[derive(Args)]
pub struct SolveArgs {
    /// Solve request as JSON, see `courier schema request`
    #[arg(short, long)]
    input: PathBuf,

    /// Write the solution as JSON instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: SolveArgs, config: &EngineConfig) -> Result<(), anyhow::Error> {
    info!("Solving {:?}", args.input);
    let request: JsonSolveRequest = file_utils::read_json(&args.input)?;

    let client = TravelMatrixClient::new(MemoryMatricesCache::new());
    let request = request.into_solve_request(&client, &config.matrix_provider)?;
    let solution = engine::solve(request, config)?;

    if args.output.is_some() {
        println!("{}", routes_table(&solution));
    }
    file_utils::write_json(args.output.as_deref(), &solution)?;

    Ok(())
}

fn routes_table(solution: &SolutionSet) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Vehicle",
        "Stops",
        "Max load",
        "Distance (km)",
        "Time (min)",
    ]);

    for route in &solution.routes {
        table.add_row(vec![
            route.vehicle_id.clone(),
            route
                .stops
                .iter()
                .map(|stop| stop.id())
                .collect::<Vec<_>>()
                .join(" > "),
            format!("{:.1}", route.max_load()),
            format!("{:.2}", route.total_distance_km),
            route.total_time_minutes.to_string(),
        ]);
    }

    table.add_row(vec![
        solution.status.to_string(),
        format!("{} violations", solution.violations.len()),
        String::new(),
        format!("{:.2}", solution.total_distance_km),
        solution.total_time_minutes.to_string(),
    ]);

    table
}
