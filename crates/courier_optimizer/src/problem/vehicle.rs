use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::define_index_newtype;

use super::problem_error::ProblemError;

define_index_newtype!(VehicleIdx, Vehicle);

fn default_max_working_hours() -> f64 {
    8.0
}

fn default_cost_per_km() -> f64 {
    2.5
}

fn default_fixed_cost() -> f64 {
    50.0
}

fn default_emissions_factor() -> f64 {
    0.25
}

fn default_speed_kmh() -> f64 {
    50.0
}

fn default_available() -> bool {
    true
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub capacity: f64,
    #[serde(default = "default_max_working_hours")]
    pub max_working_hours: f64,
    #[serde(default = "default_cost_per_km")]
    pub cost_per_km: f64,
    #[serde(default = "default_fixed_cost")]
    pub fixed_cost: f64,
    /// kg of CO2 per km.
    #[serde(default = "default_emissions_factor")]
    pub emissions_factor: f64,
    #[serde(default = "default_speed_kmh")]
    pub speed_kmh: f64,
    #[serde(default = "default_available")]
    pub available: bool,
}

/// The part of a vehicle that drives route economics.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
pub struct VehicleCostProfile {
    pub capacity: f64,
    pub cost_per_km: f64,
    pub fixed_cost: f64,
    pub emissions_factor: f64,
}

impl Vehicle {
    pub fn new(id: impl Into<String>, capacity: f64) -> Self {
        Vehicle {
            id: id.into(),
            capacity,
            max_working_hours: default_max_working_hours(),
            cost_per_km: default_cost_per_km(),
            fixed_cost: default_fixed_cost(),
            emissions_factor: default_emissions_factor(),
            speed_kmh: default_speed_kmh(),
            available: default_available(),
        }
    }

    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.id.is_empty() {
            return Err(ProblemError::invalid_vehicle(&self.id, "id is empty"));
        }

        if !(self.capacity.is_finite() && self.capacity > 0.0) {
            return Err(ProblemError::invalid_vehicle(
                &self.id,
                format!("capacity must be positive, got {}", self.capacity),
            ));
        }

        if !(self.speed_kmh.is_finite() && self.speed_kmh > 0.0) {
            return Err(ProblemError::invalid_vehicle(
                &self.id,
                format!("speed must be positive, got {}", self.speed_kmh),
            ));
        }

        let costs = [
            ("cost_per_km", self.cost_per_km),
            ("fixed_cost", self.fixed_cost),
            ("emissions_factor", self.emissions_factor),
            ("max_working_hours", self.max_working_hours),
        ];
        if let Some((name, value)) = costs
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        {
            return Err(ProblemError::invalid_vehicle(
                &self.id,
                format!("{name} must not be negative, got {value}"),
            ));
        }

        Ok(())
    }

    pub fn cost_profile(&self) -> VehicleCostProfile {
        VehicleCostProfile {
            capacity: self.capacity,
            cost_per_km: self.cost_per_km,
            fixed_cost: self.fixed_cost,
            emissions_factor: self.emissions_factor,
        }
    }

    pub fn travel_time_minutes(&self, distance_km: f64) -> f64 {
        distance_km / self.speed_kmh * 60.0
    }

    pub fn variable_cost(&self, distance_km: f64) -> f64 {
        distance_km * self.cost_per_km
    }

    pub fn emissions(&self, distance_km: f64) -> f64 {
        distance_km * self.emissions_factor
    }
}
