use std::{fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::problem_error::ProblemError;

/// Selects the arc weight minimized by the search.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Kilometers.
    #[default]
    MinimizeDistance,
    /// Travel minutes.
    MinimizeTime,
    /// Kilometers times the vehicle's cost per km, plus its fixed cost when used.
    MinimizeCost,
    /// Kilometers times the vehicle's emissions factor.
    MinimizeEmissions,
}

impl FromStr for Objective {
    type Err = ProblemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimize_distance" | "distance" => Ok(Objective::MinimizeDistance),
            "minimize_time" | "time" => Ok(Objective::MinimizeTime),
            "minimize_cost" | "cost" => Ok(Objective::MinimizeCost),
            "minimize_emissions" | "emissions" => Ok(Objective::MinimizeEmissions),
            other => Err(ProblemError::UnknownObjective(other.to_owned())),
        }
    }
}

impl Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Objective::MinimizeDistance => "minimize_distance",
                Objective::MinimizeTime => "minimize_time",
                Objective::MinimizeCost => "minimize_cost",
                Objective::MinimizeEmissions => "minimize_emissions",
            }
        )
    }
}
