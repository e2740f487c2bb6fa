use std::collections::BTreeMap;

use courier_matrix_providers::{cache::MemoryMatricesCache, travel_matrix_client::TravelMatrixClient};
use courier_optimizer::scenario::{
    scenario_engine::ScenarioEngine,
    scenario_error::ScenarioError,
    scenario_params::ScenarioOverrides,
    scenario_result::{BASELINE, ScenarioOutcome},
    sensitivity::{SensitivityInsights, SensitivityParameter, SensitivityRequest},
};

mod setup;

fn ids(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{prefix}{i:03}")).collect()
}

fn overrides(description: &str) -> ScenarioOverrides {
    ScenarioOverrides {
        description: Some(description.to_owned()),
        ..ScenarioOverrides::default()
    }
}

#[test]
fn test_scenario_deltas_against_baseline() {
    let config = setup::config();
    let provider = setup::create_provider(
        setup::create_orders(&[10.0, 15.0, 20.0, 5.0, 10.0, 12.0]),
        setup::create_vehicles(&[60.0, 60.0]),
    );
    let client = TravelMatrixClient::new(MemoryMatricesCache::new());
    let engine = ScenarioEngine::new(&config, &provider, &client);

    let scenarios = BTreeMap::from([
        (String::from(BASELINE), overrides("Current conditions")),
        (
            String::from("fuel_spike"),
            ScenarioOverrides {
                fuel_price_per_liter: Some(1.875),
                ..overrides("25% fuel price increase")
            },
        ),
        (
            String::from("add_vehicle"),
            ScenarioOverrides {
                num_vehicles: Some(3),
                ..overrides("Add one more vehicle")
            },
        ),
        (
            String::from("wage_rise"),
            ScenarioOverrides {
                driver_wage_per_hour: Some(18.0),
                ..overrides("Driver wage increase")
            },
        ),
    ]);

    let comparison = engine
        .compare_scenarios(&ids("O", 6), &ids("V", 2), &scenarios)
        .unwrap();

    assert_eq!(comparison.total_scenarios, 4);
    assert_eq!(comparison.successful_scenarios, 4);

    let baseline = comparison.get(BASELINE).and_then(ScenarioOutcome::result).unwrap();
    assert!(baseline.differences.is_none());

    for (name, outcome) in &comparison.comparison_results {
        if name == BASELINE {
            continue;
        }
        let result = outcome.result().unwrap();
        let differences = result.differences.as_ref().unwrap();
        let expected = ((result.metrics.total_cost_usd - baseline.metrics.total_cost_usd) * 100.0)
            .round()
            / 100.0;
        assert_eq!(differences.cost_delta_usd, expected, "{name}");
    }

    let add_vehicle = comparison.get("add_vehicle").and_then(ScenarioOutcome::result).unwrap();
    assert_eq!(add_vehicle.parameters.num_vehicles, 3);
}

#[test]
fn test_infeasible_scenario_is_recorded() {
    let config = setup::config();
    let provider = setup::create_provider(
        setup::create_orders(&[40.0, 40.0, 40.0]),
        setup::create_vehicles(&[100.0, 100.0]),
    );
    let client = TravelMatrixClient::new(MemoryMatricesCache::new());
    let engine = ScenarioEngine::new(&config, &provider, &client);

    let scenarios = BTreeMap::from([
        (String::from(BASELINE), overrides("Current conditions")),
        (
            String::from("one_vehicle"),
            ScenarioOverrides {
                num_vehicles: Some(1),
                ..overrides("Remove a vehicle")
            },
        ),
    ]);

    let comparison = engine
        .compare_scenarios(&ids("O", 3), &ids("V", 2), &scenarios)
        .unwrap();

    assert_eq!(comparison.successful_scenarios, 1);
    assert!(matches!(
        comparison.get("one_vehicle"),
        Some(ScenarioOutcome::Failed { description, .. }) if description == "Remove a vehicle"
    ));
}

#[test]
fn test_fuel_price_sensitivity() {
    let config = setup::config();
    let provider = setup::create_provider(
        setup::create_orders(&[10.0, 10.0, 10.0, 10.0]),
        setup::create_vehicles(&[100.0]),
    );
    let client = TravelMatrixClient::new(MemoryMatricesCache::new());
    let engine = ScenarioEngine::new(&config, &provider, &client);

    let analysis = engine
        .analyze_sensitivity(
            &ids("O", 4),
            &ids("V", 1),
            &SensitivityRequest {
                parameter: SensitivityParameter::FuelPrice,
                min: 1.0,
                max: 2.5,
                steps: 5,
            },
        )
        .unwrap();

    let values: Vec<f64> = analysis
        .results
        .iter()
        .map(|sample| sample.parameter_value)
        .collect();
    assert_eq!(values, vec![1.0, 1.375, 1.75, 2.125, 2.5]);

    let distances: Vec<f64> = analysis
        .results
        .iter()
        .map(|sample| sample.total_distance_km)
        .collect();
    assert!(distances.windows(2).all(|w| w[0] == w[1]));

    let SensitivityInsights::Impact { cost_impact, .. } = &analysis.insights else {
        panic!("expected impact insights");
    };
    assert!(cost_impact.absolute_change_usd > 0.0);
}

#[test]
fn test_speed_reduction_stretches_time() {
    let config = setup::config();
    let provider = setup::create_provider(
        setup::create_orders(&[10.0, 10.0, 10.0]),
        setup::create_vehicles(&[100.0]),
    );
    let client = TravelMatrixClient::new(MemoryMatricesCache::new());
    let engine = ScenarioEngine::new(&config, &provider, &client);

    let analysis = engine
        .analyze_sensitivity(
            &ids("O", 3),
            &ids("V", 1),
            &SensitivityRequest {
                parameter: SensitivityParameter::SpeedReduction,
                min: 0.0,
                max: 0.5,
                steps: 2,
            },
        )
        .unwrap();

    let [free_flow, slowed] = analysis.results.as_slice() else {
        panic!("expected two samples");
    };
    assert!((slowed.total_time_minutes - 2.0 * free_flow.total_time_minutes).abs() < 1e-6);
}

#[test]
fn test_unknown_parameter_is_an_input_error() {
    assert!(matches!(
        "traffic".parse::<SensitivityParameter>(),
        Err(ScenarioError::UnknownParameter(_))
    ));
}
