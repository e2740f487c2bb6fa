use std::sync::Arc;

use courier_matrix_providers::{matrix_error::MatrixError, travel_matrices::TravelMatrices};

use super::node::NodeIdx;

pub type Distance = f64;
pub type Time = i64;
pub type Cost = f64;

/// This matrix use a flat structure to store distances and times between nodes.
/// To find the index for a pair of nodes, use the formula:
/// `index = from * num_nodes + to`
#[derive(Debug, Clone)]
pub struct TravelCostMatrix {
    distances: Arc<Vec<Distance>>,
    times: Arc<Vec<Time>>,
    num_nodes: usize,
    is_symmetric: bool,
}

impl TravelCostMatrix {
    /// Times are floored to whole minutes.
    pub fn from_travel_matrices(
        matrices: &TravelMatrices,
        num_nodes: usize,
    ) -> Result<Self, MatrixError> {
        matrices.validate(num_nodes)?;

        if let Some(&actual) = matrices
            .distances
            .iter()
            .chain(matrices.times.iter())
            .find(|value| !(value.is_finite() && **value >= 0.0))
        {
            return Err(MatrixError::InvalidEntry(actual));
        }

        Ok(TravelCostMatrix {
            distances: Arc::new(matrices.distances.clone()),
            times: Arc::new(matrices.times.iter().map(|t| t.floor() as Time).collect()),
            num_nodes,
            is_symmetric: matrices.is_symmetric(),
        })
    }

    #[inline(always)]
    fn index(&self, from: NodeIdx, to: NodeIdx) -> usize {
        from.get() * self.num_nodes + to.get()
    }

    #[inline(always)]
    pub fn distance(&self, from: NodeIdx, to: NodeIdx) -> Distance {
        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn time(&self, from: NodeIdx, to: NodeIdx) -> Time {
        self.times[self.index(from, to)]
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_are_floored() {
        let matrices = TravelMatrices {
            distances: vec![0.0, 1.0, 1.0, 0.0],
            times: vec![0.0, 12.9, 12.1, 0.0],
            costs: None,
        };

        let matrix = TravelCostMatrix::from_travel_matrices(&matrices, 2).unwrap();

        assert_eq!(matrix.time(NodeIdx::new(0), NodeIdx::new(1)), 12);
        assert_eq!(matrix.time(NodeIdx::new(1), NodeIdx::new(0)), 12);
        assert!(!matrix.is_symmetric());
    }

    #[test]
    fn test_rejects_negative_entries() {
        let matrices = TravelMatrices {
            distances: vec![0.0, -1.0, 1.0, 0.0],
            times: vec![0.0; 4],
            costs: None,
        };

        assert!(TravelCostMatrix::from_travel_matrices(&matrices, 2).is_err());
    }
}
