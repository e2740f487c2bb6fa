use courier_matrix_providers::matrix_error::MatrixError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("Order {id}: {reason}")]
    InvalidOrder { id: String, reason: String },

    #[error("Vehicle {id}: {reason}")]
    InvalidVehicle { id: String, reason: String },

    #[error("Depot {id}: {reason}")]
    InvalidDepot { id: String, reason: String },

    #[error("Duplicate order id {0}")]
    DuplicateOrder(String),

    #[error("No available vehicles")]
    NoAvailableVehicles,

    #[error("No orders to route")]
    NoOrders,

    #[error("Unknown objective: {0}")]
    UnknownObjective(String),

    #[error("Invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error("Travel matrices are required")]
    MissingMatrices,

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

impl ProblemError {
    pub(crate) fn invalid_order(id: &str, reason: impl Into<String>) -> Self {
        ProblemError::InvalidOrder {
            id: id.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_vehicle(id: &str, reason: impl Into<String>) -> Self {
        ProblemError::InvalidVehicle {
            id: id.to_owned(),
            reason: reason.into(),
        }
    }
}
