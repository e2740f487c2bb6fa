use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FUEL_PRICE_PER_LITER: f64 = 1.5;
pub const DEFAULT_DRIVER_WAGE_PER_HOUR: f64 = 15.0;
pub const DEFAULT_FUEL_EFFICIENCY_KM_PER_LITER: f64 = 10.0;
pub const DEFAULT_REGULAR_HOURS: f64 = 8.0;
pub const DEFAULT_OVERTIME_MULTIPLIER: f64 = 1.5;

/// Prices applied to route distance and time.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
pub struct EconomicsParams {
    pub fuel_price_per_liter: f64,
    pub driver_wage_per_hour: f64,
    #[serde(default = "default_fuel_efficiency")]
    pub fuel_efficiency_km_per_liter: f64,
    /// Shift length after which hours are paid at the overtime rate.
    #[serde(default = "default_regular_hours")]
    pub regular_hours: f64,
    #[serde(default = "default_overtime_multiplier")]
    pub overtime_multiplier: f64,
}

fn default_fuel_efficiency() -> f64 {
    DEFAULT_FUEL_EFFICIENCY_KM_PER_LITER
}

fn default_regular_hours() -> f64 {
    DEFAULT_REGULAR_HOURS
}

fn default_overtime_multiplier() -> f64 {
    DEFAULT_OVERTIME_MULTIPLIER
}

impl Default for EconomicsParams {
    fn default() -> Self {
        EconomicsParams {
            fuel_price_per_liter: DEFAULT_FUEL_PRICE_PER_LITER,
            driver_wage_per_hour: DEFAULT_DRIVER_WAGE_PER_HOUR,
            fuel_efficiency_km_per_liter: DEFAULT_FUEL_EFFICIENCY_KM_PER_LITER,
            regular_hours: DEFAULT_REGULAR_HOURS,
            overtime_multiplier: DEFAULT_OVERTIME_MULTIPLIER,
        }
    }
}

impl EconomicsParams {
    pub fn with_prices(fuel_price_per_liter: f64, driver_wage_per_hour: f64) -> Self {
        EconomicsParams {
            fuel_price_per_liter,
            driver_wage_per_hour,
            ..EconomicsParams::default()
        }
    }
}
