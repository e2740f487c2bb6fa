use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{problem::vehicle::VehicleCostProfile, validator::violation::ConstraintViolation};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverStatus {
    /// The search converged before the time budget ran out.
    Optimal,
    /// The time budget cut the search short.
    Feasible,
    /// At least one required order could not be served.
    Infeasible,
}

impl Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SolverStatus::Optimal => "OPTIMAL",
                SolverStatus::Feasible => "FEASIBLE",
                SolverStatus::Infeasible => "INFEASIBLE",
            }
        )
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stop {
    Depot { id: String },
    Delivery { order_id: String, cold_chain: bool },
}

impl Stop {
    pub fn id(&self) -> &str {
        match self {
            Stop::Depot { id } => id,
            Stop::Delivery { order_id, .. } => order_id,
        }
    }

    pub fn is_depot(&self) -> bool {
        matches!(self, Stop::Depot { .. })
    }

    pub fn is_cold_chain(&self) -> bool {
        matches!(self, Stop::Delivery { cold_chain: true, .. })
    }
}

/// One vehicle's route, from the depot back to the depot.
///
/// `stops`, `load_sequence` and `time_sequence` have the same length. Times are minutes
/// from midnight: departure at the first depot stop, service start at each delivery,
/// arrival at the last depot stop.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub vehicle_id: String,
    pub stops: Vec<Stop>,
    pub load_sequence: Vec<f64>,
    pub time_sequence: Vec<i64>,
    pub total_distance_km: f64,
    pub total_time_minutes: i64,
    pub vehicle: VehicleCostProfile,
}

impl RoutePlan {
    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn num_deliveries(&self) -> usize {
        self.stops.iter().filter(|stop| !stop.is_depot()).count()
    }

    pub fn max_load(&self) -> f64 {
        self.load_sequence.iter().copied().fold(0.0, f64::max)
    }

    /// Minutes since the route left the depot when `stop` was reached.
    pub fn elapsed_at(&self, stop: usize) -> i64 {
        match self.time_sequence.first() {
            Some(start) => self.time_sequence[stop] - start,
            None => 0,
        }
    }
    /// Same route with every elapsed time stretched by `multiplier`, rounded to the minute.
    /// The departure from the depot is kept.
    pub fn slowed_down(mut self, multiplier: f64) -> Self {
        if let Some(&start) = self.time_sequence.first() {
            for time in self.time_sequence.iter_mut() {
                *time = start + ((*time - start) as f64 * multiplier).round() as i64;
            }
        }
        self.total_time_minutes = (self.total_time_minutes as f64 * multiplier).round() as i64;
        self
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct SolutionSet {
    pub status: SolverStatus,
    pub routes: Vec<RoutePlan>,
    pub total_distance_km: f64,
    pub total_time_minutes: i64,
    /// Search objective, drop penalties included.
    pub objective_value: f64,
    /// Optional orders left unserved.
    #[serde(default)]
    pub dropped_order_ids: Vec<String>,
    /// Required orders no route could take, only set when infeasible.
    #[serde(default)]
    pub unassigned_order_ids: Vec<String>,
    #[serde(default)]
    pub violations: Vec<ConstraintViolation>,
}

impl SolutionSet {
    pub fn infeasible(unassigned_order_ids: Vec<String>, dropped_order_ids: Vec<String>) -> Self {
        SolutionSet {
            status: SolverStatus::Infeasible,
            routes: Vec::new(),
            total_distance_km: 0.0,
            total_time_minutes: 0,
            objective_value: 0.0,
            dropped_order_ids,
            unassigned_order_ids,
            violations: Vec::new(),
        }
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn num_deliveries(&self) -> usize {
        self.routes.iter().map(RoutePlan::num_deliveries).sum()
    }

    pub fn all_constraints_satisfied(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn is_feasible(&self) -> bool {
        self.status != SolverStatus::Infeasible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> RoutePlan {
        RoutePlan {
            vehicle_id: String::from("V1"),
            stops: vec![
                Stop::Depot {
                    id: String::from("D1"),
                },
                Stop::Delivery {
                    order_id: String::from("O1"),
                    cold_chain: true,
                },
                Stop::Delivery {
                    order_id: String::from("O2"),
                    cold_chain: false,
                },
                Stop::Depot {
                    id: String::from("D1"),
                },
            ],
            load_sequence: vec![0.0, 10.0, 30.0, 30.0],
            time_sequence: vec![468, 480, 492, 516],
            total_distance_km: 40.0,
            total_time_minutes: 48,
            vehicle: crate::problem::vehicle::Vehicle::new("V1", 100.0).cost_profile(),
        }
    }

    #[test]
    fn test_route_plan_helpers() {
        let plan = plan();

        assert_eq!(plan.num_stops(), 4);
        assert_eq!(plan.num_deliveries(), 2);
        assert_eq!(plan.max_load(), 30.0);
        assert_eq!(plan.elapsed_at(1), 12);
        assert!(plan.stops[1].is_cold_chain());
        assert_eq!(plan.stops[3].id(), "D1");
    }

    #[test]
    fn test_slowed_down() {
        let slow = plan().slowed_down(1.25);

        assert_eq!(slow.time_sequence, vec![468, 483, 498, 528]);
        assert_eq!(slow.total_time_minutes, 60);
        assert_eq!(slow.total_distance_km, 40.0);
        assert_eq!(slow.elapsed_at(3), 60);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(SolutionSet::infeasible(vec![String::from("O1")], vec![]))
            .unwrap();

        assert_eq!(json["status"], "INFEASIBLE");
        assert_eq!(json["routes"].as_array().unwrap().len(), 0);
        assert_eq!(json["unassigned_order_ids"][0], "O1");

        let stop = serde_json::to_value(&plan().stops[1]).unwrap();
        assert_eq!(stop["kind"], "delivery");
        assert_eq!(stop["order_id"], "O1");
    }
}
