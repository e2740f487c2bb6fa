use std::path::PathBuf;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use courier_matrix_providers::{cache::MemoryMatricesCache, travel_matrix_client::TravelMatrixClient};
use courier_optimizer::{
    engine::EngineConfig,
    json::types::JsonDataset,
    scenario::{
        data_provider::InMemoryDataProvider,
        scenario_engine::ScenarioEngine,
        sensitivity::{SensitivityAnalysis, SensitivityInsights, SensitivityParameter, SensitivityRequest},
    },
};

use crate::file_utils;

#[derive(Args)]
pub struct SensitivityArgs {
    /// Orders, vehicles and depot, see `courier schema dataset`
    #[arg(short, long)]
    dataset: PathBuf,

    /// fuel_price, driver_wage, speed_reduction or max_time
    #[arg(short, long)]
    parameter: String,

    #[arg(long)]
    min: f64,

    #[arg(long)]
    max: f64,

    #[arg(long, default_value_t = 5)]
    steps: usize,

    /// Comma separated order ids, all orders when omitted
    #[arg(long, value_delimiter = ',')]
    orders: Option<Vec<String>>,

    /// Comma separated vehicle ids, all vehicles when omitted
    #[arg(long, value_delimiter = ',')]
    vehicles: Option<Vec<String>>,

    /// Write the analysis as JSON instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: SensitivityArgs, config: &EngineConfig) -> Result<(), anyhow::Error> {
    let parameter: SensitivityParameter = args.parameter.parse()?;
    let dataset: JsonDataset = file_utils::read_json(&args.dataset)?;

    let order_ids = args.orders.unwrap_or_else(|| dataset.order_ids());
    let vehicle_ids = args.vehicles.unwrap_or_else(|| dataset.vehicle_ids());
    let provider = InMemoryDataProvider::from(dataset);
    let client = TravelMatrixClient::new(MemoryMatricesCache::new());

    let analysis = ScenarioEngine::new(config, &provider, &client).analyze_sensitivity(
        &order_ids,
        &vehicle_ids,
        &SensitivityRequest {
            parameter,
            min: args.min,
            max: args.max,
            steps: args.steps,
        },
    )?;

    if args.output.is_some() {
        println!("{}", series_table(&analysis));
        if let SensitivityInsights::Impact { recommendation, .. } = &analysis.insights {
            println!("{recommendation}");
        }
    }
    file_utils::write_json(args.output.as_deref(), &analysis)?;

    Ok(())
}

fn series_table(analysis: &SensitivityAnalysis) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        analysis.parameter.to_string(),
        String::from("Cost (USD)"),
        String::from("Time (min)"),
        String::from("Distance (km)"),
        String::from("Emissions (kg)"),
    ]);

    for sample in &analysis.results {
        table.add_row(vec![
            format!("{:.3}", sample.parameter_value),
            format!("{:.2}", sample.total_cost_usd),
            format!("{:.1}", sample.total_time_minutes),
            format!("{:.2}", sample.total_distance_km),
            format!("{:.2}", sample.total_emissions_kg),
        ]);
    }

    table
}
