use std::hash::{Hash, Hasher};

use fxhash::{FxHashMap, FxHasher64};
use parking_lot::RwLock;
use tracing::debug;

use crate::{travel_matrices::TravelMatrices, travel_matrix_provider::TravelMatrixProvider};

pub trait MatricesCache {
    fn cache<P>(&self, provider: &TravelMatrixProvider, points: &[P], matrices: &TravelMatrices)
    where
        for<'a> &'a P: Into<geo_types::Point>;

    fn get_cached<P>(&self, provider: &TravelMatrixProvider, points: &[P]) -> Option<TravelMatrices>
    where
        for<'a> &'a P: Into<geo_types::Point>;
}

/// Exact key: the ordered coordinate bits plus a fingerprint of the provider.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
struct CacheKey {
    points: Vec<[u64; 2]>,
    provider: u64,
}

impl CacheKey {
    fn new<P>(provider: &TravelMatrixProvider, points: &[P]) -> Self
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let points = points
            .iter()
            .map(|point| {
                let point: geo_types::Point = point.into();
                [point.x().to_bits(), point.y().to_bits()]
            })
            .collect();

        let mut hasher = FxHasher64::default();
        provider.hash(&mut hasher);

        CacheKey {
            points,
            provider: hasher.finish(),
        }
    }
}

/// In-memory cache shared between concurrent solves.
/// Concurrent writes for the same key are idempotent, the last writer wins.
#[derive(Default)]
pub struct MemoryMatricesCache {
    entries: RwLock<FxHashMap<CacheKey, TravelMatrices>>,
}

impl MemoryMatricesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl MatricesCache for MemoryMatricesCache {
    fn cache<P>(&self, provider: &TravelMatrixProvider, points: &[P], matrices: &TravelMatrices)
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let key = CacheKey::new(provider, points);
        debug!(points = points.len(), "Caching travel matrices");
        self.entries.write().insert(key, matrices.clone());
    }

    fn get_cached<P>(&self, provider: &TravelMatrixProvider, points: &[P]) -> Option<TravelMatrices>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let key = CacheKey::new(provider, points);
        self.entries.read().get(&key).cloned()
    }
}

/// Cache that never stores anything.
pub struct NoopMatricesCache;

impl MatricesCache for NoopMatricesCache {
    fn cache<P>(&self, _provider: &TravelMatrixProvider, _points: &[P], _matrices: &TravelMatrices)
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
    }

    fn get_cached<P>(&self, _provider: &TravelMatrixProvider, _points: &[P]) -> Option<TravelMatrices>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        None
    }
}
