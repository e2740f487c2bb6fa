use courier_matrix_providers::matrix_error::MatrixError;
use thiserror::Error;

use crate::{problem::problem_error::ProblemError, scenario::data_provider::ProviderError};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Problem(#[from] ProblemError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidOverride { name: &'static str, reason: String },

    #[error("Sensitivity analysis needs at least one step")]
    NoSteps,

    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("No feasible routes, unassigned orders: {}", .0.join(", "))]
    Infeasible(Vec<String>),

    #[error("No scenarios to compare")]
    NoScenarios,

    #[error("Cannot build the scenario thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ScenarioError {
    pub(crate) fn invalid_override(name: &'static str, reason: impl Into<String>) -> Self {
        ScenarioError::InvalidOverride {
            name,
            reason: reason.into(),
        }
    }
}
