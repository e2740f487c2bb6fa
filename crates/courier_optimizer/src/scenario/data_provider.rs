use fxhash::FxHashMap;
use thiserror::Error;

use crate::problem::{depot::Depot, order::Order, vehicle::Vehicle};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown order id {0}")]
    UnknownOrder(String),

    #[error("Unknown vehicle id {0}")]
    UnknownVehicle(String),

    #[error("No depot configured")]
    MissingDepot,
}

/// Resolves ids to fully loaded records, typically backed by a database.
pub trait DataProvider: Send + Sync {
    /// Orders in the same order as `ids`.
    fn orders(&self, ids: &[String]) -> Result<Vec<Order>, ProviderError>;

    /// Vehicles in the same order as `ids`, ids may repeat.
    fn vehicles(&self, ids: &[String]) -> Result<Vec<Vehicle>, ProviderError>;

    fn depot(&self) -> Result<Depot, ProviderError>;
}

#[derive(Default)]
pub struct InMemoryDataProvider {
    orders: FxHashMap<String, Order>,
    vehicles: FxHashMap<String, Vehicle>,
    depot: Option<Depot>,
}

impl InMemoryDataProvider {
    pub fn new(orders: Vec<Order>, vehicles: Vec<Vehicle>, depot: Option<Depot>) -> Self {
        InMemoryDataProvider {
            orders: orders
                .into_iter()
                .map(|order| (order.id.clone(), order))
                .collect(),
            vehicles: vehicles
                .into_iter()
                .map(|vehicle| (vehicle.id.clone(), vehicle))
                .collect(),
            depot,
        }
    }

    pub fn order_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.orders.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn vehicle_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.vehicles.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl DataProvider for InMemoryDataProvider {
    fn orders(&self, ids: &[String]) -> Result<Vec<Order>, ProviderError> {
        ids.iter()
            .map(|id| {
                self.orders
                    .get(id)
                    .cloned()
                    .ok_or_else(|| ProviderError::UnknownOrder(id.clone()))
            })
            .collect()
    }

    fn vehicles(&self, ids: &[String]) -> Result<Vec<Vehicle>, ProviderError> {
        ids.iter()
            .map(|id| {
                self.vehicles
                    .get(id)
                    .cloned()
                    .ok_or_else(|| ProviderError::UnknownVehicle(id.clone()))
            })
            .collect()
    }

    fn depot(&self) -> Result<Depot, ProviderError> {
        self.depot.clone().ok_or(ProviderError::MissingDepot)
    }
}
