use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    DriverOvertime,
    ColdChainViolation,
}

/// Breach of a limit the search does not enforce, reported next to the solution.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintViolation {
    DriverOvertime {
        severity: Severity,
        vehicle_id: String,
        route_time_minutes: i64,
        max_allowed_minutes: i64,
        overtime_minutes: i64,
        message: String,
    },
    ColdChainViolation {
        severity: Severity,
        vehicle_id: String,
        order_id: String,
        delivery_time_minutes: i64,
        max_allowed_minutes: i64,
        excess_time_minutes: i64,
        message: String,
    },
}

impl ConstraintViolation {
    pub fn driver_overtime(vehicle_id: &str, route_time: i64, max_allowed: i64) -> Self {
        let overtime = route_time - max_allowed;
        ConstraintViolation::DriverOvertime {
            severity: Severity::High,
            vehicle_id: vehicle_id.to_owned(),
            route_time_minutes: route_time,
            max_allowed_minutes: max_allowed,
            overtime_minutes: overtime,
            message: format!(
                "Route exceeds {:.1}-hour driver limit by {} minutes ({:.1} hours)",
                max_allowed as f64 / 60.0,
                overtime,
                overtime as f64 / 60.0
            ),
        }
    }

    pub fn cold_chain(vehicle_id: &str, order_id: &str, delivery_time: i64, max_allowed: i64) -> Self {
        ConstraintViolation::ColdChainViolation {
            severity: Severity::Critical,
            vehicle_id: vehicle_id.to_owned(),
            order_id: order_id.to_owned(),
            delivery_time_minutes: delivery_time,
            max_allowed_minutes: max_allowed,
            excess_time_minutes: delivery_time - max_allowed,
            message: format!(
                "Cold-chain order {order_id} delivered after {delivery_time} min (limit: {max_allowed} min = {:.1} hours)",
                max_allowed as f64 / 60.0
            ),
        }
    }

    pub fn kind(&self) -> ViolationKind {
        match self {
            ConstraintViolation::DriverOvertime { .. } => ViolationKind::DriverOvertime,
            ConstraintViolation::ColdChainViolation { .. } => ViolationKind::ColdChainViolation,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ConstraintViolation::DriverOvertime { severity, .. }
            | ConstraintViolation::ColdChainViolation { severity, .. } => *severity,
        }
    }

    pub fn vehicle_id(&self) -> &str {
        match self {
            ConstraintViolation::DriverOvertime { vehicle_id, .. }
            | ConstraintViolation::ColdChainViolation { vehicle_id, .. } => vehicle_id,
        }
    }

    /// Minutes beyond the limit.
    pub fn magnitude(&self) -> i64 {
        match self {
            ConstraintViolation::DriverOvertime {
                overtime_minutes, ..
            } => *overtime_minutes,
            ConstraintViolation::ColdChainViolation {
                excess_time_minutes,
                ..
            } => *excess_time_minutes,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ConstraintViolation::DriverOvertime { message, .. }
            | ConstraintViolation::ColdChainViolation { message, .. } => message,
        }
    }
}
