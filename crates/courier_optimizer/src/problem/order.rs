use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{location::Location, problem_error::ProblemError, time_window::TimeWindow};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A delivery request, immutable for the duration of a solve.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub customer_id: String,
    pub demand: f64,
    /// Minutes spent on site.
    #[serde(default)]
    pub service_time: i64,
    pub time_window: TimeWindow,
    pub location: Location,
    #[serde(default)]
    pub cold_chain: bool,
    #[serde(default)]
    pub priority: Priority,
}

impl Order {
    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.id.is_empty() {
            return Err(ProblemError::invalid_order(&self.id, "id is empty"));
        }

        if !(self.demand.is_finite() && self.demand > 0.0) {
            return Err(ProblemError::invalid_order(
                &self.id,
                format!("demand must be positive, got {}", self.demand),
            ));
        }

        if self.service_time < 0 {
            return Err(ProblemError::invalid_order(
                &self.id,
                format!("service time must not be negative, got {}", self.service_time),
            ));
        }

        if !self.time_window.is_valid() {
            return Err(ProblemError::invalid_order(
                &self.id,
                format!(
                    "invalid time window [{}, {}]",
                    self.time_window.start, self.time_window.end
                ),
            ));
        }

        if !self.location.is_valid() {
            return Err(ProblemError::invalid_order(&self.id, "invalid location"));
        }

        Ok(())
    }

    pub fn time_window_duration(&self) -> i64 {
        self.time_window.duration()
    }

    pub fn is_flexible(&self) -> bool {
        self.time_window.is_flexible()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_validate_demand() {
        let mut order = test_utils::create_order("O1", 10.0, (480, 600));
        assert!(order.validate().is_ok());

        order.demand = 0.0;
        assert!(matches!(
            order.validate(),
            Err(ProblemError::InvalidOrder { id, .. }) if id == "O1"
        ));
    }

    #[test]
    fn test_validate_time_window() {
        let mut order = test_utils::create_order("O1", 10.0, (600, 480));
        assert!(order.validate().is_err());

        order.time_window = TimeWindow::new(480, 600);
        order.service_time = -5;
        assert!(order.validate().is_err());
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": "O1",
                "demand": 5,
                "time_window": { "start": 480, "end": 720 },
                "location": { "latitude": 40.7, "longitude": -74.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(order.priority, Priority::Medium);
        assert!(!order.cold_chain);
        assert_eq!(order.service_time, 0);
        assert_eq!(order.time_window_duration(), 240);
        assert!(!order.is_flexible());
    }
}
