use std::collections::BTreeMap;

use courier_matrix_providers::{
    cache::MatricesCache, travel_matrices::TravelMatrices, travel_matrix_client::TravelMatrixClient,
};
use rayon::prelude::*;
use tracing::{Level, debug, info, instrument, warn};

use crate::{
    economics::{
        economics_evaluator::{self, RouteEconomicsInput},
        economics_params::EconomicsParams,
    },
    engine::{self, EngineConfig, SolveRequest},
    solution_set::RoutePlan,
    problem::{
        constraint_set::ConstraintSet, depot::Depot, objective::Objective, order::Order,
        problem_error::ProblemError, vehicle::Vehicle,
    },
    scenario::{
        data_provider::DataProvider,
        scenario_error::ScenarioError,
        scenario_params::{AppliedParams, ScenarioOverrides},
        scenario_result::{ScenarioComparison, ScenarioMetrics, ScenarioOutcome, ScenarioResult},
        sensitivity::{self, SensitivityAnalysis, SensitivityRange, SensitivityRequest, SensitivitySample},
    },
};

/// Orders, vehicles and matrices shared read-only by every scenario of a call.
struct BaseData {
    orders: Vec<Order>,
    vehicles: Vec<Vehicle>,
    depot: Depot,
    matrices: TravelMatrices,
}

/// One scenario of a call with its overrides already merged.
struct PlannedScenario {
    name: String,
    description: String,
    parameters: AppliedParams,
}

/// Re-solves one routing problem under varying costs, traffic and fleet size.
pub struct ScenarioEngine<'a, P, C> {
    config: &'a EngineConfig,
    provider: &'a P,
    matrix_client: &'a TravelMatrixClient<C>,
}

impl<'a, P, C> ScenarioEngine<'a, P, C>
where
    P: DataProvider,
    C: MatricesCache,
{
    pub fn new(
        config: &'a EngineConfig,
        provider: &'a P,
        matrix_client: &'a TravelMatrixClient<C>,
    ) -> Self {
        ScenarioEngine {
            config,
            provider,
            matrix_client,
        }
    }

    /// Runs every scenario, then compares each one to the `baseline` scenario if present.
    ///
    /// Unknown ids and broken matrices fail the whole call, a scenario that cannot be
    /// solved only fails its own entry.
    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn compare_scenarios(
        &self,
        order_ids: &[String],
        vehicle_ids: &[String],
        scenarios: &BTreeMap<String, ScenarioOverrides>,
    ) -> Result<ScenarioComparison, ScenarioError> {
        if scenarios.is_empty() {
            return Err(ScenarioError::NoScenarios);
        }

        let base = self.load(order_ids, vehicle_ids)?;
        info!(
            scenarios = scenarios.len(),
            orders = base.orders.len(),
            vehicles = base.vehicles.len(),
            "Comparing scenarios"
        );

        let scenarios = scenarios
            .iter()
            .map(|(name, overrides)| self.plan(&base, name.clone(), overrides))
            .collect::<Result<Vec<_>, _>>()?;
        let outcomes = self.run_all(&base, &scenarios)?;

        Ok(ScenarioComparison::new(outcomes.into_iter().collect()))
    }

    /// Sweeps one parameter over evenly spaced values, one scenario per value.
    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn analyze_sensitivity(
        &self,
        order_ids: &[String],
        vehicle_ids: &[String],
        request: &SensitivityRequest,
    ) -> Result<SensitivityAnalysis, ScenarioError> {
        request.validate()?;

        let base = self.load(order_ids, vehicle_ids)?;
        let values = request.values();
        info!(
            parameter = %request.parameter,
            min = request.min,
            max = request.max,
            steps = request.steps,
            "Analyzing sensitivity"
        );

        let scenarios = values
            .iter()
            .map(|&value| {
                self.plan(
                    &base,
                    request.parameter.scenario_name(value),
                    &request.parameter.overrides(value),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let outcomes = self.run_all(&base, &scenarios)?;

        let results: Vec<SensitivitySample> = values
            .iter()
            .zip(&outcomes)
            .filter_map(|(&value, (_, outcome))| {
                outcome
                    .result()
                    .map(|result| SensitivitySample::new(value, result))
            })
            .collect();

        Ok(SensitivityAnalysis {
            parameter: request.parameter,
            range: SensitivityRange {
                min: request.min,
                max: request.max,
            },
            steps: request.steps,
            insights: sensitivity::insights(request.parameter, &results),
            results,
        })
    }

    fn load(&self, order_ids: &[String], vehicle_ids: &[String]) -> Result<BaseData, ScenarioError> {
        let orders = self.provider.orders(order_ids)?;
        let vehicles = self.provider.vehicles(vehicle_ids)?;
        let depot = self.provider.depot()?;
        let matrices = engine::travel_matrices(
            self.matrix_client,
            &self.config.matrix_provider,
            &depot,
            &orders,
        )?;

        Ok(BaseData {
            orders,
            vehicles,
            depot,
            matrices,
        })
    }

    /// Resolves the parameters of one scenario, an invalid override fails the whole call.
    fn plan(
        &self,
        base: &BaseData,
        name: String,
        overrides: &ScenarioOverrides,
    ) -> Result<PlannedScenario, ScenarioError> {
        let parameters = self
            .config
            .scenario
            .merge(overrides, base.vehicles.len())?;
        let description = overrides
            .description
            .clone()
            .unwrap_or_else(|| name.clone());

        Ok(PlannedScenario {
            name,
            description,
            parameters,
        })
    }

    /// Outcomes in the order of `scenarios`, solved on a pool sized by the configured
    /// parallelism.
    fn run_all(
        &self,
        base: &BaseData,
        scenarios: &[PlannedScenario],
    ) -> Result<Vec<(String, ScenarioOutcome)>, ScenarioError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.parallelism.number_of_threads())
            .build()?;
        let config = self.config;

        Ok(pool.install(|| {
            scenarios
                .par_iter()
                .map(|scenario| (scenario.name.clone(), run_scenario(config, base, scenario)))
                .collect()
        }))
    }
}

fn run_scenario(config: &EngineConfig, base: &BaseData, scenario: &PlannedScenario) -> ScenarioOutcome {
    let PlannedScenario {
        name,
        description,
        parameters,
    } = scenario;
    info!(scenario = %name, %description, "Running scenario");

    match solve_scenario(config, base, description, *parameters) {
        Ok(result) => {
            info!(
                scenario = %name,
                total_cost = result.metrics.total_cost_usd,
                routes = result.metrics.num_routes,
                status = %result.metrics.solver_status,
                "Scenario finished"
            );
            ScenarioOutcome::Success(result)
        }
        Err(error) => {
            warn!(scenario = %name, %error, "Scenario failed");
            ScenarioOutcome::Failed {
                description: description.clone(),
                error: error.to_string(),
            }
        }
    }
}

fn solve_scenario(
    config: &EngineConfig,
    base: &BaseData,
    description: &str,
    parameters: AppliedParams,
) -> Result<ScenarioResult, ScenarioError> {
    let request = SolveRequest {
        orders: base.orders.clone(),
        vehicles: scenario_vehicles(&base.vehicles, parameters.num_vehicles)?,
        depot: base.depot.clone(),
        matrices: base.matrices.clone(),
        constraints: ConstraintSet {
            max_route_time_minutes: parameters.max_time,
            ..ConstraintSet::default()
        },
        objective: Objective::MinimizeDistance,
        time_limit: None,
    };

    let solution = engine::solve(request, config)?;
    if !solution.is_feasible() {
        return Err(ScenarioError::Infeasible(solution.unassigned_order_ids));
    }

    let multiplier = parameters.time_multiplier();
    let routes: Vec<RouteEconomicsInput> = solution
        .routes
        .iter()
        .map(|route| RouteEconomicsInput::from(route).with_time_multiplier(multiplier))
        .collect();
    let plans: Vec<RoutePlan> = solution
        .routes
        .into_iter()
        .map(|route| route.slowed_down(multiplier))
        .collect();
    let total_time_minutes = routes.iter().map(|route| route.time_minutes).sum();
    debug!(multiplier, total_time_minutes, "Applied traffic slowdown");

    let economics = economics_evaluator::evaluate(
        &routes,
        &EconomicsParams {
            fuel_price_per_liter: parameters.fuel_price,
            driver_wage_per_hour: parameters.driver_wage,
            ..config.economics
        },
    );

    Ok(ScenarioResult {
        description: description.to_owned(),
        parameters,
        metrics: ScenarioMetrics {
            total_cost_usd: economics.total_cost,
            total_distance_km: solution.total_distance_km,
            total_time_minutes,
            total_emissions_kg: economics.total_emissions_kg,
            fuel_cost_usd: economics.fuel_cost,
            labor_cost_usd: economics.labor_cost,
            num_routes: plans.len(),
            solver_status: solution.status,
        },
        economics,
        routes: plans,
        violations: solution.violations,
        differences: None,
    })
}

/// Truncates the fleet, or grows it with copies of the last vehicle.
fn scenario_vehicles(base: &[Vehicle], count: usize) -> Result<Vec<Vehicle>, ProblemError> {
    let Some(last) = base.last() else {
        return Err(ProblemError::NoAvailableVehicles);
    };

    if count <= base.len() {
        return Ok(base[..count].to_vec());
    }

    let mut vehicles = base.to_vec();
    vehicles.extend((base.len()..count).map(|index| Vehicle {
        id: format!("{}_{}", last.id, index + 1),
        ..last.clone()
    }));

    Ok(vehicles)
}
