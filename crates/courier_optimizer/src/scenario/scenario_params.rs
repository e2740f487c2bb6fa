use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    economics::economics_params::{DEFAULT_DRIVER_WAGE_PER_HOUR, DEFAULT_FUEL_PRICE_PER_LITER},
    problem::constraint_set::DEFAULT_MAX_ROUTE_TIME_MINUTES,
    scenario::scenario_error::ScenarioError,
};

/// Values a scenario starts from before its overrides are applied.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ScenarioParams {
    pub fuel_price_per_liter: f64,
    pub driver_wage_per_hour: f64,
    /// Fraction of the average speed lost to traffic, in `[0, 1)`.
    pub avg_speed_reduction: f64,
    pub max_route_time_minutes: i64,
    /// `None` keeps the vehicles given to the comparison.
    pub num_vehicles: Option<usize>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        ScenarioParams {
            fuel_price_per_liter: DEFAULT_FUEL_PRICE_PER_LITER,
            driver_wage_per_hour: DEFAULT_DRIVER_WAGE_PER_HOUR,
            avg_speed_reduction: 0.0,
            max_route_time_minutes: DEFAULT_MAX_ROUTE_TIME_MINUTES,
            num_vehicles: None,
        }
    }
}

/// Partial set of parameters, every field left out falls back to [`ScenarioParams`].
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioOverrides {
    pub description: Option<String>,
    pub fuel_price_per_liter: Option<f64>,
    pub driver_wage_per_hour: Option<f64>,
    pub avg_speed_reduction: Option<f64>,
    pub max_route_time_minutes: Option<i64>,
    pub num_vehicles: Option<usize>,
}

/// Parameters a scenario was actually run with.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
pub struct AppliedParams {
    pub fuel_price: f64,
    pub driver_wage: f64,
    pub speed_reduction: f64,
    pub max_time: i64,
    pub num_vehicles: usize,
}

impl AppliedParams {
    /// Factor applied to route times: losing a fraction `r` of the speed takes `1 / (1 - r)`
    /// times as long.
    pub fn time_multiplier(&self) -> f64 {
        1.0 / (1.0 - self.speed_reduction)
    }
}

impl ScenarioParams {
    /// Field by field, an override wins over the default. The vehicle count falls back to
    /// `base_vehicle_count` when neither sets it.
    pub fn merge(
        &self,
        overrides: &ScenarioOverrides,
        base_vehicle_count: usize,
    ) -> Result<AppliedParams, ScenarioError> {
        let applied = AppliedParams {
            fuel_price: overrides
                .fuel_price_per_liter
                .unwrap_or(self.fuel_price_per_liter),
            driver_wage: overrides
                .driver_wage_per_hour
                .unwrap_or(self.driver_wage_per_hour),
            speed_reduction: overrides
                .avg_speed_reduction
                .unwrap_or(self.avg_speed_reduction),
            max_time: overrides
                .max_route_time_minutes
                .unwrap_or(self.max_route_time_minutes),
            num_vehicles: overrides
                .num_vehicles
                .or(self.num_vehicles)
                .unwrap_or(base_vehicle_count),
        };

        applied.validate()?;
        Ok(applied)
    }
}

impl AppliedParams {
    fn validate(&self) -> Result<(), ScenarioError> {
        if !(self.fuel_price.is_finite() && self.fuel_price >= 0.0) {
            return Err(ScenarioError::invalid_override(
                "fuel_price_per_liter",
                format!("must not be negative, got {}", self.fuel_price),
            ));
        }

        if !(self.driver_wage.is_finite() && self.driver_wage >= 0.0) {
            return Err(ScenarioError::invalid_override(
                "driver_wage_per_hour",
                format!("must not be negative, got {}", self.driver_wage),
            ));
        }

        if !(0.0..1.0).contains(&self.speed_reduction) {
            return Err(ScenarioError::invalid_override(
                "avg_speed_reduction",
                format!("must be in [0, 1), got {}", self.speed_reduction),
            ));
        }

        if self.max_time <= 0 {
            return Err(ScenarioError::invalid_override(
                "max_route_time_minutes",
                format!("must be positive, got {}", self.max_time),
            ));
        }

        if self.num_vehicles == 0 {
            return Err(ScenarioError::invalid_override(
                "num_vehicles",
                "must be positive",
            ));
        }

        Ok(())
    }
}
