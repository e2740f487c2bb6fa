use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    economics::economics_evaluator::FleetEconomics,
    scenario::scenario_params::AppliedParams,
    solution_set::{RoutePlan, SolverStatus},
    utils::rounding::{round1, round2},
    validator::violation::ConstraintViolation,
};

pub const BASELINE: &str = "baseline";

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ScenarioMetrics {
    pub total_cost_usd: f64,
    pub total_distance_km: f64,
    /// Route times after the traffic slowdown.
    pub total_time_minutes: f64,
    pub total_emissions_kg: f64,
    pub fuel_cost_usd: f64,
    pub labor_cost_usd: f64,
    pub num_routes: usize,
    pub solver_status: SolverStatus,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ScenarioDifferences {
    pub cost_delta_usd: f64,
    /// `None` when the baseline costs nothing and the scenario does.
    pub cost_delta_percent: Option<f64>,
    pub time_delta_minutes: f64,
    pub emissions_delta_kg: f64,
}

impl ScenarioDifferences {
    pub fn between(scenario: &ScenarioMetrics, baseline: &ScenarioMetrics) -> Self {
        let cost_delta = scenario.total_cost_usd - baseline.total_cost_usd;
        let cost_delta_percent = if baseline.total_cost_usd > 0.0 {
            Some(round1(cost_delta / baseline.total_cost_usd * 100.0))
        } else if cost_delta == 0.0 {
            Some(0.0)
        } else {
            None
        };

        ScenarioDifferences {
            cost_delta_usd: round2(cost_delta),
            cost_delta_percent,
            time_delta_minutes: round1(scenario.total_time_minutes - baseline.total_time_minutes),
            emissions_delta_kg: round2(scenario.total_emissions_kg - baseline.total_emissions_kg),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    pub description: String,
    pub parameters: AppliedParams,
    pub metrics: ScenarioMetrics,
    pub economics: FleetEconomics,
    pub routes: Vec<RoutePlan>,
    #[serde(default)]
    pub violations: Vec<ConstraintViolation>,
    /// Set on every successful scenario but the baseline, when the baseline succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differences: Option<ScenarioDifferences>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    Success(ScenarioResult),
    #[serde(rename = "error")]
    Failed { description: String, error: String },
}

impl ScenarioOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ScenarioOutcome::Success(_))
    }

    pub fn description(&self) -> &str {
        match self {
            ScenarioOutcome::Success(result) => &result.description,
            ScenarioOutcome::Failed { description, .. } => description,
        }
    }

    pub fn result(&self) -> Option<&ScenarioResult> {
        match self {
            ScenarioOutcome::Success(result) => Some(result),
            ScenarioOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ScenarioComparison {
    pub total_scenarios: usize,
    pub successful_scenarios: usize,
    pub comparison_results: BTreeMap<String, ScenarioOutcome>,
}

impl ScenarioComparison {
    /// Fills the differences of every successful scenario against a successful baseline.
    pub fn new(mut comparison_results: BTreeMap<String, ScenarioOutcome>) -> Self {
        let baseline = comparison_results
            .get(BASELINE)
            .and_then(ScenarioOutcome::result)
            .map(|result| result.metrics.clone());

        if let Some(baseline) = baseline {
            for (name, outcome) in comparison_results.iter_mut() {
                if name == BASELINE {
                    continue;
                }

                if let ScenarioOutcome::Success(result) = outcome {
                    result.differences =
                        Some(ScenarioDifferences::between(&result.metrics, &baseline));
                }
            }
        }

        ScenarioComparison {
            total_scenarios: comparison_results.len(),
            successful_scenarios: comparison_results
                .values()
                .filter(|outcome| outcome.is_success())
                .count(),
            comparison_results,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.comparison_results.get(name)
    }
}
