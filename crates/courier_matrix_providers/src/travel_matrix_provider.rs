use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{matrix_error::MatrixError, planar::DEFAULT_SPEED_KMH, travel_matrices::TravelMatrices};

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TravelMatrixProvider {
    /// Scaled latitude/longitude difference, straight line.
    Planar { speed_kmh: f64 },

    /// Scaled latitude/longitude difference, rectilinear.
    Grid { speed_kmh: f64 },

    /// Delegated to an injected road network strategy.
    RoadNetwork { profile: String },

    Custom { matrices: TravelMatrices },
}

impl Default for TravelMatrixProvider {
    fn default() -> Self {
        TravelMatrixProvider::Planar {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl FromStr for TravelMatrixProvider {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planar" | "euclidean" => Ok(TravelMatrixProvider::Planar {
                speed_kmh: DEFAULT_SPEED_KMH,
            }),
            "grid" | "manhattan" => Ok(TravelMatrixProvider::Grid {
                speed_kmh: DEFAULT_SPEED_KMH,
            }),
            "road_network" | "osrm" => Ok(TravelMatrixProvider::RoadNetwork {
                profile: String::from("driving"),
            }),
            other => Err(MatrixError::UnknownMetric(other.to_owned())),
        }
    }
}

impl std::hash::Hash for TravelMatrixProvider {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            TravelMatrixProvider::Planar { speed_kmh } => {
                state.write_u8(0);
                state.write_u64(speed_kmh.to_bits());
            }
            TravelMatrixProvider::Grid { speed_kmh } => {
                state.write_u8(1);
                state.write_u64(speed_kmh.to_bits());
            }
            TravelMatrixProvider::RoadNetwork { profile } => {
                state.write_u8(2);
                profile.hash(state);
            }
            TravelMatrixProvider::Custom { matrices } => {
                state.write_u8(3);
                matrices.hash(state);
            }
        }
    }
}
