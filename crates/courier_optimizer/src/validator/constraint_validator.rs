use tracing::{debug, warn};

use crate::{
    problem::constraint_set::ConstraintSet,
    solution_set::{RoutePlan, SolutionSet},
    validator::violation::ConstraintViolation,
};

/// Checks every route against the driver working limit and the cold-chain deadline.
///
/// Pure over the routes, the result only depends on `solution` and `constraints`.
pub fn validate(solution: &SolutionSet, constraints: &ConstraintSet) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();

    for route in &solution.routes {
        check_overtime(route, constraints, &mut violations);
        check_cold_chain(route, constraints, &mut violations);
    }

    if violations.is_empty() {
        debug!(routes = solution.routes.len(), "All constraints satisfied");
    } else {
        warn!(violations = violations.len(), "Constraint violations detected");
    }

    violations
}

fn check_overtime(
    route: &RoutePlan,
    constraints: &ConstraintSet,
    violations: &mut Vec<ConstraintViolation>,
) {
    let Some(last) = route.time_sequence.len().checked_sub(1) else {
        return;
    };
    let elapsed = route.elapsed_at(last);

    if elapsed > constraints.max_route_time_minutes {
        violations.push(ConstraintViolation::driver_overtime(
            &route.vehicle_id,
            elapsed,
            constraints.max_route_time_minutes,
        ));
    }
}

fn check_cold_chain(
    route: &RoutePlan,
    constraints: &ConstraintSet,
    violations: &mut Vec<ConstraintViolation>,
) {
    let limit = constraints.cold_chain_time_limit_minutes;

    for (index, stop) in route.stops.iter().enumerate() {
        if !stop.is_cold_chain() || index >= route.time_sequence.len() {
            continue;
        }

        let delivered_after = route.elapsed_at(index);
        if delivered_after > limit {
            violations.push(ConstraintViolation::cold_chain(
                &route.vehicle_id,
                stop.id(),
                delivered_after,
                limit,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::vehicle::Vehicle,
        solution_set::{SolverStatus, Stop},
        validator::violation::ViolationKind,
    };

    use super::*;

    fn depot() -> Stop {
        Stop::Depot {
            id: String::from("D1"),
        }
    }

    fn delivery(order_id: &str, cold_chain: bool) -> Stop {
        Stop::Delivery {
            order_id: order_id.to_owned(),
            cold_chain,
        }
    }

    fn solution(routes: Vec<RoutePlan>) -> SolutionSet {
        SolutionSet {
            status: SolverStatus::Optimal,
            total_distance_km: 0.0,
            total_time_minutes: routes.iter().map(|route| route.total_time_minutes).sum(),
            routes,
            objective_value: 0.0,
            dropped_order_ids: Vec::new(),
            unassigned_order_ids: Vec::new(),
            violations: Vec::new(),
        }
    }

    fn route(stops: Vec<Stop>, time_sequence: Vec<i64>) -> RoutePlan {
        let total_time_minutes = time_sequence.last().unwrap() - time_sequence[0];
        RoutePlan {
            vehicle_id: String::from("V1"),
            load_sequence: vec![0.0; stops.len()],
            stops,
            time_sequence,
            total_distance_km: 10.0,
            total_time_minutes,
            vehicle: Vehicle::new("V1", 100.0).cost_profile(),
        }
    }

    #[test]
    fn test_overtime() {
        let solution = solution(vec![route(
            vec![depot(), delivery("O1", false), depot()],
            vec![0, 250, 500],
        )]);
        let constraints = ConstraintSet {
            max_route_time_minutes: 480,
            ..ConstraintSet::default()
        };

        let violations = validate(&solution, &constraints);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind(), ViolationKind::DriverOvertime);
        assert!(matches!(
            violations[0],
            ConstraintViolation::DriverOvertime {
                overtime_minutes: 20,
                route_time_minutes: 500,
                ..
            }
        ));
    }

    #[test]
    fn test_cold_chain() {
        let solution = solution(vec![route(
            vec![
                depot(),
                delivery("O1", false),
                delivery("O2", true),
                delivery("O3", true),
                depot(),
            ],
            vec![0, 100, 110, 150, 200],
        )]);
        let constraints = ConstraintSet {
            cold_chain_time_limit_minutes: 120,
            ..ConstraintSet::default()
        };

        let violations = validate(&solution, &constraints);

        assert_eq!(violations.len(), 1);
        assert!(matches!(
            &violations[0],
            ConstraintViolation::ColdChainViolation {
                order_id,
                excess_time_minutes: 30,
                ..
            } if order_id == "O3"
        ));
    }

    #[test]
    fn test_cold_chain_counts_from_route_start() {
        let solution = solution(vec![route(
            vec![depot(), delivery("O1", true), depot()],
            vec![480, 590, 610],
        )]);

        assert!(validate(&solution, &ConstraintSet::default()).is_empty());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let solution = solution(vec![
            route(
                vec![depot(), delivery("O1", true), depot()],
                vec![0, 150, 600],
            ),
            route(vec![depot(), delivery("O2", false), depot()], vec![0, 10, 20]),
        ]);
        let constraints = ConstraintSet::default();

        let first = validate(&solution, &constraints);
        let second = validate(&solution, &constraints);

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_within_limits() {
        let solution = solution(vec![route(
            vec![depot(), delivery("O1", true), depot()],
            vec![0, 120, 480],
        )]);

        assert!(validate(&solution, &ConstraintSet::default()).is_empty());
    }
}
