use std::{fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    scenario::{
        scenario_error::ScenarioError,
        scenario_params::{ScenarioOverrides, ScenarioParams},
        scenario_result::ScenarioResult,
    },
    utils::rounding::{round1, round2},
};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityParameter {
    /// Per liter.
    FuelPrice,
    /// Per hour.
    DriverWage,
    /// Fraction in `[0, 1)`.
    SpeedReduction,
    /// Max route minutes, truncated to an integer.
    MaxTime,
}

impl FromStr for SensitivityParameter {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fuel_price" => Ok(SensitivityParameter::FuelPrice),
            "driver_wage" => Ok(SensitivityParameter::DriverWage),
            "speed_reduction" => Ok(SensitivityParameter::SpeedReduction),
            "max_time" => Ok(SensitivityParameter::MaxTime),
            other => Err(ScenarioError::UnknownParameter(other.to_owned())),
        }
    }
}

impl Display for SensitivityParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SensitivityParameter::FuelPrice => "fuel_price",
                SensitivityParameter::DriverWage => "driver_wage",
                SensitivityParameter::SpeedReduction => "speed_reduction",
                SensitivityParameter::MaxTime => "max_time",
            }
        )
    }
}

impl SensitivityParameter {
    pub fn overrides(&self, value: f64) -> ScenarioOverrides {
        let mut overrides = ScenarioOverrides::default();
        match self {
            SensitivityParameter::FuelPrice => overrides.fuel_price_per_liter = Some(value),
            SensitivityParameter::DriverWage => overrides.driver_wage_per_hour = Some(value),
            SensitivityParameter::SpeedReduction => overrides.avg_speed_reduction = Some(value),
            SensitivityParameter::MaxTime => overrides.max_route_time_minutes = Some(value as i64),
        }
        overrides
    }

    pub fn scenario_name(&self, value: f64) -> String {
        format!("{self}_{value:.2}")
    }

    fn recommendation(&self, cost_percent: f64, time_change: f64) -> &'static str {
        match self {
            SensitivityParameter::FuelPrice if cost_percent.abs() > 20.0 => {
                "Fuel costs are highly sensitive. Consider fuel hedging contracts or route optimization to minimize distance."
            }
            SensitivityParameter::FuelPrice => {
                "Fuel price changes have moderate impact. Current routing efficiency is good."
            }
            SensitivityParameter::DriverWage if cost_percent.abs() > 15.0 => {
                "Labor costs dominate. Focus on minimizing total route time and number of vehicles needed."
            }
            SensitivityParameter::DriverWage => {
                "Labor costs are well-controlled. Current vehicle utilization is efficient."
            }
            SensitivityParameter::SpeedReduction if time_change > 60.0 => {
                "Traffic has major impact on delivery times. Consider earlier dispatch times or alternate routes."
            }
            SensitivityParameter::SpeedReduction => {
                "Routes are resilient to moderate traffic delays."
            }
            SensitivityParameter::MaxTime => "Analysis complete. Review results for insights.",
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct SensitivityRequest {
    pub parameter: SensitivityParameter,
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_steps")]
    pub steps: usize,
}

fn default_steps() -> usize {
    5
}

impl SensitivityRequest {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.steps == 0 {
            return Err(ScenarioError::NoSteps);
        }

        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(ScenarioError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }

        // Every parameter's domain is an interval, checking both ends covers the sweep
        let defaults = ScenarioParams::default();
        for value in [self.min, self.max] {
            defaults.merge(&self.parameter.overrides(value), 1)?;
        }

        Ok(())
    }

    pub fn values(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.steps)
    }
}

/// `steps` evenly spaced values from `min` to `max`, both included once `steps >= 2`.
pub fn linspace(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (steps - 1) as f64;
            let mut values: Vec<f64> = (0..steps).map(|i| min + step * i as f64).collect();
            values[steps - 1] = max;
            values
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct SensitivitySample {
    pub parameter_value: f64,
    pub total_cost_usd: f64,
    pub total_time_minutes: f64,
    pub total_distance_km: f64,
    pub total_emissions_kg: f64,
}

impl SensitivitySample {
    pub fn new(parameter_value: f64, result: &ScenarioResult) -> Self {
        SensitivitySample {
            parameter_value,
            total_cost_usd: result.metrics.total_cost_usd,
            total_time_minutes: result.metrics.total_time_minutes,
            total_distance_km: result.metrics.total_distance_km,
            total_emissions_kg: result.metrics.total_emissions_kg,
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityLevel {
    High,
    Moderate,
    Low,
}

impl SensitivityLevel {
    fn from_percent(percent: f64) -> Self {
        if percent.abs() > 20.0 {
            SensitivityLevel::High
        } else if percent.abs() > 10.0 {
            SensitivityLevel::Moderate
        } else {
            SensitivityLevel::Low
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct CostImpact {
    pub absolute_change_usd: f64,
    pub percent_change: f64,
    pub sensitivity: SensitivityLevel,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct TimeImpact {
    pub absolute_change_minutes: f64,
    pub significant: bool,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SensitivityInsights {
    Impact {
        cost_impact: CostImpact,
        time_impact: TimeImpact,
        recommendation: String,
    },
    Insufficient {
        message: String,
    },
}

/// Compares the first and the last sample of the series.
pub fn insights(
    parameter: SensitivityParameter,
    samples: &[SensitivitySample],
) -> SensitivityInsights {
    let [first, .., last] = samples else {
        return insufficient();
    };

    let cost_change = last.total_cost_usd - first.total_cost_usd;
    let cost_percent = if first.total_cost_usd > 0.0 {
        cost_change / first.total_cost_usd * 100.0
    } else {
        0.0
    };
    let time_change = last.total_time_minutes - first.total_time_minutes;

    SensitivityInsights::Impact {
        cost_impact: CostImpact {
            absolute_change_usd: round2(cost_change),
            percent_change: round1(cost_percent),
            sensitivity: SensitivityLevel::from_percent(cost_percent),
        },
        time_impact: TimeImpact {
            absolute_change_minutes: round1(time_change),
            significant: time_change.abs() > 30.0,
        },
        recommendation: parameter
            .recommendation(cost_percent, time_change)
            .to_owned(),
    }
}

fn insufficient() -> SensitivityInsights {
    SensitivityInsights::Insufficient {
        message: String::from("Insufficient data for insights"),
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct SensitivityRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct SensitivityAnalysis {
    pub parameter: SensitivityParameter,
    pub range: SensitivityRange,
    pub steps: usize,
    /// One sample per successful scenario, in increasing parameter order.
    pub results: Vec<SensitivitySample>,
    pub insights: SensitivityInsights,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(parameter_value: f64, total_cost_usd: f64, total_time_minutes: f64) -> SensitivitySample {
        SensitivitySample {
            parameter_value,
            total_cost_usd,
            total_time_minutes,
            total_distance_km: 10.0,
            total_emissions_kg: 2.5,
        }
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(1.0, 2.5, 5), vec![1.0, 1.375, 1.75, 2.125, 2.5]);
        assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
        assert_eq!(linspace(0.0, 0.3, 2), vec![0.0, 0.3]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_parse_parameter() {
        assert_eq!(
            "speed_reduction".parse::<SensitivityParameter>().unwrap(),
            SensitivityParameter::SpeedReduction
        );
        assert!(matches!(
            "weather".parse::<SensitivityParameter>(),
            Err(ScenarioError::UnknownParameter(name)) if name == "weather"
        ));
    }

    #[test]
    fn test_overrides_and_names() {
        let parameter = SensitivityParameter::MaxTime;
        assert_eq!(parameter.overrides(420.9).max_route_time_minutes, Some(420));
        assert_eq!(parameter.scenario_name(420.9), "max_time_420.90");
        assert_eq!(
            SensitivityParameter::FuelPrice.overrides(1.75).fuel_price_per_liter,
            Some(1.75)
        );
    }

    #[test]
    fn test_request_validation() {
        let request = SensitivityRequest {
            parameter: SensitivityParameter::FuelPrice,
            min: 2.0,
            max: 1.0,
            steps: 3,
        };
        assert!(matches!(
            request.validate(),
            Err(ScenarioError::InvalidRange { .. })
        ));

        let request = SensitivityRequest {
            min: 1.0,
            steps: 0,
            ..request
        };
        assert!(matches!(request.validate(), Err(ScenarioError::NoSteps)));
    }

    #[test]
    fn test_range_outside_parameter_domain() {
        let traffic = SensitivityRequest {
            parameter: SensitivityParameter::SpeedReduction,
            min: 0.0,
            max: 1.0,
            steps: 5,
        };
        assert!(matches!(
            traffic.validate(),
            Err(ScenarioError::InvalidOverride {
                name: "avg_speed_reduction",
                ..
            })
        ));
        assert!(
            SensitivityRequest {
                max: 0.5,
                ..traffic.clone()
            }
            .validate()
            .is_ok()
        );

        let wage = SensitivityRequest {
            parameter: SensitivityParameter::DriverWage,
            min: -5.0,
            max: 20.0,
            steps: 3,
        };
        assert!(matches!(
            wage.validate(),
            Err(ScenarioError::InvalidOverride { .. })
        ));

        let max_time = SensitivityRequest {
            parameter: SensitivityParameter::MaxTime,
            min: 0.5,
            max: 480.0,
            steps: 3,
        };
        assert!(matches!(
            max_time.validate(),
            Err(ScenarioError::InvalidOverride { .. })
        ));
    }

    #[test]
    fn test_insights_high_fuel_sensitivity() {
        let insights = insights(
            SensitivityParameter::FuelPrice,
            &[sample(1.0, 100.0, 60.0), sample(2.5, 125.0, 60.0)],
        );

        let SensitivityInsights::Impact {
            cost_impact,
            time_impact,
            recommendation,
        } = insights
        else {
            panic!("expected impact insights");
        };

        assert_eq!(cost_impact.absolute_change_usd, 25.0);
        assert_eq!(cost_impact.percent_change, 25.0);
        assert_eq!(cost_impact.sensitivity, SensitivityLevel::High);
        assert!(!time_impact.significant);
        assert!(recommendation.starts_with("Fuel costs are highly sensitive"));
    }

    #[test]
    fn test_insights_traffic() {
        let insights = insights(
            SensitivityParameter::SpeedReduction,
            &[
                sample(0.0, 100.0, 100.0),
                sample(0.25, 105.0, 133.3),
                sample(0.5, 112.0, 200.0),
            ],
        );

        let SensitivityInsights::Impact {
            cost_impact,
            time_impact,
            recommendation,
        } = insights
        else {
            panic!("expected impact insights");
        };

        assert_eq!(cost_impact.sensitivity, SensitivityLevel::Moderate);
        assert_eq!(time_impact.absolute_change_minutes, 100.0);
        assert!(time_impact.significant);
        assert!(recommendation.starts_with("Traffic has major impact"));
    }

    #[test]
    fn test_insufficient_data() {
        let insights = insights(SensitivityParameter::DriverWage, &[sample(15.0, 100.0, 60.0)]);

        assert_eq!(
            insights,
            SensitivityInsights::Insufficient {
                message: String::from("Insufficient data for insights")
            }
        );
        assert_eq!(
            serde_json::to_value(&insights).unwrap()["message"],
            "Insufficient data for insights"
        );
    }
}
