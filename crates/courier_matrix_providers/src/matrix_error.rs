use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("At least 2 locations are required to build a distance matrix, got {0}")]
    NotEnoughLocations(usize),

    #[error("Unknown distance metric: {0}")]
    UnknownMetric(String),

    #[error("Location {index} has a non-finite coordinate")]
    InvalidCoordinate { index: usize },

    #[error("Average speed must be positive, got {0} km/h")]
    InvalidSpeed(f64),

    #[error("No road network strategy configured for profile '{0}'")]
    RoadNetworkUnavailable(String),

    #[error("Road network lookup failed: {0}")]
    RoadNetwork(String),

    #[error("Matrix entries must be finite and non-negative, got {0}")]
    InvalidEntry(f64),

    #[error("Matrix has {actual} entries, expected {expected} for {num_locations} locations")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        num_locations: usize,
    },
}
