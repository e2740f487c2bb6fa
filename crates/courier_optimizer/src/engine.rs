use std::sync::Arc;

use courier_matrix_providers::{
    cache::MatricesCache, matrix_error::MatrixError, travel_matrices::TravelMatrices,
    travel_matrix_client::TravelMatrixClient, travel_matrix_provider::TravelMatrixProvider,
};
use jiff::SignedDuration;
use tracing::{debug, instrument};

use crate::{
    economics::economics_params::EconomicsParams,
    problem::{
        constraint_set::ConstraintSet,
        depot::Depot,
        location::Location,
        objective::Objective,
        order::Order,
        problem_error::ProblemError,
        vehicle::Vehicle,
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    },
    scenario::scenario_params::ScenarioParams,
    solution_set::SolutionSet,
    solver::{
        solver::Solver,
        solver_params::{DEFAULT_TIME_LIMIT, SolverParams, Threads},
    },
    validator::{constraint_validator, violation::ConstraintViolation},
};

/// Everything a solve or a scenario run needs besides its input data.
///
/// Built once by the caller and shared by reference, nothing in the engine mutates it.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub solver: SolverParams,
    pub economics: EconomicsParams,
    pub scenario: ScenarioParams,
    /// Upper bound of scenarios solved at the same time.
    pub parallelism: Threads,
    pub matrix_provider: TravelMatrixProvider,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            solver: SolverParams::default(),
            economics: EconomicsParams::default(),
            scenario: ScenarioParams::default(),
            parallelism: Threads::Auto,
            matrix_provider: TravelMatrixProvider::default(),
        }
    }
}

impl EngineConfig {
    /// Wall-clock budget of a solve: the request, then the constraints, then the config.
    pub fn time_limit(
        &self,
        requested: Option<SignedDuration>,
        constraints: &ConstraintSet,
    ) -> SignedDuration {
        requested
            .or(constraints.time_limit)
            .or_else(|| self.solver.time_limit())
            .unwrap_or(DEFAULT_TIME_LIMIT)
    }
}

/// Fully resolved input of a single solve.
#[derive(Clone, Debug)]
pub struct SolveRequest {
    pub orders: Vec<Order>,
    pub vehicles: Vec<Vehicle>,
    pub depot: Depot,
    /// Depot first, then the orders in the order of `orders`.
    pub matrices: TravelMatrices,
    pub constraints: ConstraintSet,
    pub objective: Objective,
    pub time_limit: Option<SignedDuration>,
}

impl SolveRequest {
    pub fn build_problem(
        self,
        params: &SolverParams,
    ) -> Result<(VehicleRoutingProblem, ConstraintSet), ProblemError> {
        let constraints = self.constraints.clone();

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_depot(self.depot)
            .set_orders(self.orders)
            .set_vehicles(self.vehicles)
            .set_travel_matrices(self.matrices)
            .set_constraints(self.constraints)
            .set_objective(self.objective)
            .set_waiting_slack(params.waiting_slack_minutes)
            .set_drop_penalty(params.drop_penalty);

        Ok((builder.build()?, constraints))
    }
}

/// Routes the orders of `request`, then annotates the result with constraint violations.
///
/// Infeasibility is reported through the status of the returned solution, only malformed
/// input is an error.
#[instrument(skip_all, level = "debug")]
pub fn solve(request: SolveRequest, config: &EngineConfig) -> Result<SolutionSet, ProblemError> {
    let time_limit = config.time_limit(request.time_limit, &request.constraints);
    let params = config.solver.clone().with_time_limit(time_limit);
    debug!(%time_limit, "Solve budget");

    let (problem, constraints) = request.build_problem(&params)?;
    let mut solution = Solver::new(Arc::new(problem), params).solve();
    solution.violations = validate(&solution, &constraints);

    Ok(solution)
}

/// Driver overtime and cold-chain checks over an existing solution.
pub fn validate(solution: &SolutionSet, constraints: &ConstraintSet) -> Vec<ConstraintViolation> {
    constraint_validator::validate(solution, constraints)
}

/// Distance and time matrices over the depot followed by `orders`.
pub fn travel_matrices<C>(
    client: &TravelMatrixClient<C>,
    provider: &TravelMatrixProvider,
    depot: &Depot,
    orders: &[Order],
) -> Result<TravelMatrices, MatrixError>
where
    C: MatricesCache,
{
    let points: Vec<Location> = std::iter::once(depot.location)
        .chain(orders.iter().map(|order| order.location))
        .collect();

    client.fetch_matrix(&points, provider)
}

#[cfg(test)]
mod tests {
    use courier_matrix_providers::cache::MemoryMatricesCache;

    use crate::{
        solution_set::SolverStatus,
        solver::solver_params::Termination,
        test_utils,
        validator::violation::ViolationKind,
    };

    use super::*;

    fn config() -> EngineConfig {
        EngineConfig {
            solver: SolverParams {
                terminations: vec![Termination::Iterations(30)],
                ..SolverParams::default()
            },
            parallelism: Threads::Single,
            ..EngineConfig::default()
        }
    }

    fn request(orders: Vec<Order>, capacity: f64) -> SolveRequest {
        let matrices = test_utils::create_line_matrices(orders.len() + 1, 10.0);
        SolveRequest {
            orders,
            vehicles: vec![Vehicle::new("V1", capacity)],
            depot: Depot::new("D1", Location::new(40.0, -74.0)),
            matrices,
            constraints: ConstraintSet::default(),
            objective: Objective::MinimizeDistance,
            time_limit: None,
        }
    }

    #[test]
    fn test_time_limit_precedence() {
        let mut config = config();
        let mut constraints = ConstraintSet::default();

        assert_eq!(config.time_limit(None, &constraints), DEFAULT_TIME_LIMIT);

        config.solver = config
            .solver
            .with_time_limit(SignedDuration::from_secs(7));
        assert_eq!(
            config.time_limit(None, &constraints),
            SignedDuration::from_secs(7)
        );

        constraints.time_limit = Some(SignedDuration::from_secs(3));
        assert_eq!(
            config.time_limit(None, &constraints),
            SignedDuration::from_secs(3)
        );
        assert_eq!(
            config.time_limit(Some(SignedDuration::from_secs(1)), &constraints),
            SignedDuration::from_secs(1)
        );
    }

    #[test]
    fn test_solve_reports_cold_chain_violation() {
        // O1 closes early and keeps the driver 150 minutes, O2 only opens afterwards.
        let mut first = test_utils::create_order("O1", 5.0, (0, 20));
        first.service_time = 150;
        let mut cold = test_utils::create_order("O2", 5.0, (150, 1440));
        cold.cold_chain = true;
        let orders = vec![first, cold];

        let solution = solve(request(orders, 100.0), &config()).unwrap();

        assert!(solution.is_feasible());
        assert!(
            solution
                .violations
                .iter()
                .any(|violation| violation.kind() == ViolationKind::ColdChainViolation)
        );
    }

    #[test]
    fn test_solve_infeasible_is_not_an_error() {
        let solution = solve(
            request(
                vec![test_utils::create_order("O1", 50.0, (0, 1440))],
                10.0,
            ),
            &config(),
        )
        .unwrap();

        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(solution.routes.is_empty());
        assert!(solution.violations.is_empty());
    }

    #[test]
    fn test_solve_rejects_bad_input() {
        let mut request = request(vec![test_utils::create_order("O1", 5.0, (0, 1440))], 100.0);
        request.vehicles[0].capacity = 0.0;

        assert!(matches!(
            solve(request, &config()),
            Err(ProblemError::InvalidVehicle { .. })
        ));
    }

    #[test]
    fn test_travel_matrices_put_depot_first() {
        let client = TravelMatrixClient::new(MemoryMatricesCache::new());
        let depot = Depot::new("D1", Location::new(40.0, -74.0));
        let mut order = test_utils::create_order("O1", 5.0, (0, 1440));
        order.location = Location::new(40.0, -73.9);

        let matrices =
            travel_matrices(&client, &TravelMatrixProvider::default(), &depot, &[order]).unwrap();

        assert_eq!(matrices.distance(0, 0), 0.0);
        assert!(matrices.distance(0, 1) > 0.0);
        assert_eq!(matrices.distance(0, 1), matrices.distance(1, 0));
    }
}
