use tracing::{debug, instrument};

use crate::{
    cache::MatricesCache,
    matrix_error::MatrixError,
    planar::{grid_matrices, planar_matrices},
    travel_matrices::TravelMatrices,
    travel_matrix_provider::TravelMatrixProvider,
};

/// Pluggable road network lookup, typically backed by an external routing service.
/// Must return matrices in km and minutes, in the order of `points`.
pub trait RoadNetworkMatrices: Send + Sync {
    fn fetch(
        &self,
        points: &[geo_types::Point],
        profile: &str,
    ) -> Result<TravelMatrices, MatrixError>;
}

pub struct TravelMatrixClient<C> {
    cache: C,
    road_network: Option<Box<dyn RoadNetworkMatrices>>,
}

impl<C> TravelMatrixClient<C>
where
    C: MatricesCache,
{
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            road_network: None,
        }
    }

    pub fn with_road_network(mut self, road_network: Box<dyn RoadNetworkMatrices>) -> Self {
        self.road_network = Some(road_network);
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    #[instrument(skip_all, level = "debug")]
    pub fn fetch_matrix<P>(
        &self,
        points: &[P],
        provider: &TravelMatrixProvider,
    ) -> Result<TravelMatrices, MatrixError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if points.len() < 2 {
            return Err(MatrixError::NotEnoughLocations(points.len()));
        }

        if let Some(matrices) = self.cache.get_cached(provider, points) {
            debug!(points = points.len(), "Travel matrices cache hit");
            return Ok(matrices);
        }

        let matrices = match provider {
            TravelMatrixProvider::Planar { speed_kmh } => planar_matrices(points, *speed_kmh)?,
            TravelMatrixProvider::Grid { speed_kmh } => grid_matrices(points, *speed_kmh)?,
            TravelMatrixProvider::RoadNetwork { profile } => {
                let road_network = self
                    .road_network
                    .as_ref()
                    .ok_or_else(|| MatrixError::RoadNetworkUnavailable(profile.clone()))?;

                let points: Vec<geo_types::Point> =
                    points.iter().map(|point| point.into()).collect();
                road_network.fetch(&points, profile)?
            }
            TravelMatrixProvider::Custom { matrices } => matrices.clone(),
        };

        matrices.validate(points.len())?;
        self.cache.cache(provider, points, &matrices);

        Ok(matrices)
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::MemoryMatricesCache;

    use super::*;

    struct LatLon(f64, f64);

    impl From<&LatLon> for geo_types::Point {
        fn from(value: &LatLon) -> Self {
            geo_types::Point::new(value.1, value.0)
        }
    }

    struct FixedRoadNetwork;

    impl RoadNetworkMatrices for FixedRoadNetwork {
        fn fetch(
            &self,
            points: &[geo_types::Point],
            _profile: &str,
        ) -> Result<TravelMatrices, MatrixError> {
            let n = points.len();
            Ok(TravelMatrices {
                distances: vec![7.0; n * n],
                times: vec![9.0; n * n],
                costs: None,
            })
        }
    }

    fn points() -> Vec<LatLon> {
        vec![
            LatLon(40.7128, -74.0060),
            LatLon(40.7580, -73.9855),
            LatLon(40.6892, -74.0445),
        ]
    }

    #[test]
    fn test_fetch_populates_cache() {
        let client = TravelMatrixClient::new(MemoryMatricesCache::new());
        let provider = TravelMatrixProvider::default();

        let first = client.fetch_matrix(&points(), &provider).unwrap();
        assert_eq!(client.cache().len(), 1);

        let second = client.fetch_matrix(&points(), &provider).unwrap();
        assert_eq!(first, second);
        assert_eq!(client.cache().len(), 1);
    }

    #[test]
    fn test_road_network_requires_strategy() {
        let client = TravelMatrixClient::new(MemoryMatricesCache::new());
        let provider = TravelMatrixProvider::RoadNetwork {
            profile: String::from("driving"),
        };

        assert!(matches!(
            client.fetch_matrix(&points(), &provider),
            Err(MatrixError::RoadNetworkUnavailable(_))
        ));

        let client = client.with_road_network(Box::new(FixedRoadNetwork));
        let matrices = client.fetch_matrix(&points(), &provider).unwrap();
        assert_eq!(matrices.distance(0, 1), 7.0);
        assert_eq!(matrices.time(2, 1), 9.0);
    }

    #[test]
    fn test_custom_matrices_are_validated() {
        let client = TravelMatrixClient::new(MemoryMatricesCache::new());
        let provider = TravelMatrixProvider::Custom {
            matrices: TravelMatrices {
                distances: vec![0.0; 4],
                times: vec![0.0; 4],
                costs: None,
            },
        };

        assert!(matches!(
            client.fetch_matrix(&points(), &provider),
            Err(MatrixError::DimensionMismatch { expected: 9, .. })
        ));
    }

    #[test]
    fn test_rejects_single_location() {
        let client = TravelMatrixClient::new(MemoryMatricesCache::new());
        let points = vec![LatLon(40.0, -74.0)];

        assert!(matches!(
            client.fetch_matrix(&points, &TravelMatrixProvider::default()),
            Err(MatrixError::NotEnoughLocations(1))
        ));
    }
}
