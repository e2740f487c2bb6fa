use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::matrix_error::MatrixError;

/// TravelMatrices holds the travel distance (km) and time (minutes) matrices.
/// Stored as flat vectors, `index = from * num_locations + to`
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct TravelMatrices {
    pub distances: Vec<f64>,
    pub times: Vec<f64>,

    // Some providers don't give us a cost
    #[serde(default)]
    pub costs: Option<Vec<f64>>,
}

impl TravelMatrices {
    /// Builds the flat representation from square row-major matrices.
    pub fn from_rows(distances: Vec<Vec<f64>>, times: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let num_locations = distances.len();
        let expected = num_locations * num_locations;

        let distances: Vec<f64> = distances.into_iter().flatten().collect();
        let times: Vec<f64> = times.into_iter().flatten().collect();

        for actual in [distances.len(), times.len()] {
            if actual != expected {
                return Err(MatrixError::DimensionMismatch {
                    expected,
                    actual,
                    num_locations,
                });
            }
        }

        Ok(TravelMatrices {
            distances,
            times,
            costs: None,
        })
    }

    pub fn num_locations(&self) -> usize {
        self.distances.len().isqrt()
    }

    #[inline(always)]
    fn index(&self, from: usize, to: usize) -> usize {
        from * self.num_locations() + to
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[self.index(from, to)]
    }

    pub fn time(&self, from: usize, to: usize) -> f64 {
        self.times[self.index(from, to)]
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.num_locations();
        (0..n).all(|i| {
            (i + 1..n).all(|j| {
                self.distances[i * n + j] == self.distances[j * n + i]
                    && self.times[i * n + j] == self.times[j * n + i]
            })
        })
    }

    /// Checks that every matrix is square and has the expected number of locations.
    pub fn validate(&self, num_locations: usize) -> Result<(), MatrixError> {
        let expected = num_locations * num_locations;
        let lengths = [
            Some(self.distances.len()),
            Some(self.times.len()),
            self.costs.as_ref().map(|costs| costs.len()),
        ];

        for actual in lengths.into_iter().flatten() {
            if actual != expected {
                return Err(MatrixError::DimensionMismatch {
                    expected,
                    actual,
                    num_locations,
                });
            }
        }

        Ok(())
    }
}

impl std::hash::Hash for TravelMatrices {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for d in &self.distances {
            state.write_u64(d.to_bits());
        }
        for t in &self.times {
            state.write_u64(t.to_bits());
        }
        if let Some(costs) = &self.costs {
            for c in costs {
                state.write_u64(c.to_bits());
            }
        } else {
            state.write_u8(0);
        }
    }
}
