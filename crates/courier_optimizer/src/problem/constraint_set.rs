use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::problem_error::ProblemError;

pub const DEFAULT_MAX_ROUTE_TIME_MINUTES: i64 = 480;
pub const DEFAULT_COLD_CHAIN_TIME_LIMIT_MINUTES: i64 = 120;

fn default_max_route_time() -> i64 {
    DEFAULT_MAX_ROUTE_TIME_MINUTES
}

fn default_cold_chain_time_limit() -> i64 {
    DEFAULT_COLD_CHAIN_TIME_LIMIT_MINUTES
}

/// Limits applied to a single solve.
///
/// The route duration and cold-chain limits are reported by the validator,
/// they do not restrict the search.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    #[serde(default = "default_max_route_time")]
    pub max_route_time_minutes: i64,

    /// Counted from the route start.
    #[serde(default = "default_cold_chain_time_limit")]
    pub cold_chain_time_limit_minutes: i64,

    /// Orders that may be dropped at a penalty.
    #[serde(default)]
    pub excluded_order_ids: Vec<String>,

    #[serde(default)]
    pub time_limit: Option<SignedDuration>,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        ConstraintSet {
            max_route_time_minutes: DEFAULT_MAX_ROUTE_TIME_MINUTES,
            cold_chain_time_limit_minutes: DEFAULT_COLD_CHAIN_TIME_LIMIT_MINUTES,
            excluded_order_ids: Vec::new(),
            time_limit: None,
        }
    }
}

impl ConstraintSet {
    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.max_route_time_minutes <= 0 {
            return Err(ProblemError::InvalidConstraint(format!(
                "max_route_time_minutes must be positive, got {}",
                self.max_route_time_minutes
            )));
        }

        if self.cold_chain_time_limit_minutes <= 0 {
            return Err(ProblemError::InvalidConstraint(format!(
                "cold_chain_time_limit_minutes must be positive, got {}",
                self.cold_chain_time_limit_minutes
            )));
        }

        if let Some(time_limit) = self.time_limit
            && time_limit <= SignedDuration::ZERO
        {
            return Err(ProblemError::InvalidConstraint(format!(
                "time_limit must be positive, got {time_limit}"
            )));
        }

        Ok(())
    }

    pub fn is_excluded(&self, order_id: &str) -> bool {
        self.excluded_order_ids.iter().any(|id| id == order_id)
    }
}
