use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{location::Location, problem_error::ProblemError, time_window::TimeWindow};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Depot {
    pub id: String,
    pub location: Location,
    #[serde(default)]
    pub operating_window: TimeWindow,
}

impl Depot {
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Depot {
            id: id.into(),
            location,
            operating_window: TimeWindow::full_day(),
        }
    }

    pub fn validate(&self) -> Result<(), ProblemError> {
        let reason = if self.id.is_empty() {
            Some("id is empty")
        } else if !self.location.is_valid() {
            Some("invalid location")
        } else if !self.operating_window.is_valid() {
            Some("invalid operating window")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ProblemError::InvalidDepot {
                id: self.id.clone(),
                reason: reason.to_owned(),
            }),
            None => Ok(()),
        }
    }
}
