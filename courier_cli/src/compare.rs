use std::path::PathBuf;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use courier_matrix_providers::{cache::MemoryMatricesCache, travel_matrix_client::TravelMatrixClient};
use courier_optimizer::{
    engine::EngineConfig,
    json::types::{JsonDataset, JsonScenarioRequest},
    scenario::{
        data_provider::InMemoryDataProvider, scenario_engine::ScenarioEngine,
        scenario_result::{ScenarioComparison, ScenarioOutcome},
    },
};
use tracing::info;

use crate::file_utils;

#[derive(Args)]
pub struct CompareArgs {
    /// Orders, vehicles and depot, see `courier schema dataset`
    #[arg(short, long)]
    dataset: PathBuf,

    /// Scenario definitions, see `courier schema scenarios`
    #[arg(short, long)]
    scenarios: PathBuf,

    /// Write the comparison as JSON instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: CompareArgs, config: &EngineConfig) -> Result<(), anyhow::Error> {
    let dataset: JsonDataset = file_utils::read_json(&args.dataset)?;
    let request: JsonScenarioRequest = file_utils::read_json(&args.scenarios)?;
    info!(scenarios = request.scenarios.len(), "Comparing {:?}", args.scenarios);

    let order_ids = request.order_ids.unwrap_or_else(|| dataset.order_ids());
    let vehicle_ids = request.vehicle_ids.unwrap_or_else(|| dataset.vehicle_ids());
    let provider = InMemoryDataProvider::from(dataset);
    let client = TravelMatrixClient::new(MemoryMatricesCache::new());

    let comparison = ScenarioEngine::new(config, &provider, &client).compare_scenarios(
        &order_ids,
        &vehicle_ids,
        &request.scenarios,
    )?;

    if args.output.is_some() {
        println!("{}", comparison_table(&comparison));
    }
    file_utils::write_json(args.output.as_deref(), &comparison)?;

    Ok(())
}

fn comparison_table(comparison: &ScenarioComparison) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Scenario",
        "Status",
        "Cost (USD)",
        "Distance (km)",
        "Time (min)",
        "Emissions (kg)",
        "Cost delta",
    ]);

    for (name, outcome) in &comparison.comparison_results {
        match outcome {
            ScenarioOutcome::Success(result) => {
                let delta = result
                    .differences
                    .as_ref()
                    .map(|differences| match differences.cost_delta_percent {
                        Some(percent) => format!("{:+.2} ({percent:+.1}%)", differences.cost_delta_usd),
                        None => format!("{:+.2}", differences.cost_delta_usd),
                    })
                    .unwrap_or_default();

                table.add_row(vec![
                    name.clone(),
                    result.metrics.solver_status.to_string(),
                    format!("{:.2}", result.metrics.total_cost_usd),
                    format!("{:.2}", result.metrics.total_distance_km),
                    format!("{:.1}", result.metrics.total_time_minutes),
                    format!("{:.2}", result.metrics.total_emissions_kg),
                    delta,
                ]);
            }
            ScenarioOutcome::Failed { error, .. } => {
                table.add_row(vec![name.clone(), String::from("ERROR"), error.clone()]);
            }
        }
    }

    table
}
