use std::collections::BTreeMap;

use courier_matrix_providers::{
    cache::MatricesCache, matrix_error::MatrixError, travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
};
use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    engine::{self, SolveRequest},
    problem::{
        constraint_set::ConstraintSet, depot::Depot, objective::Objective, order::Order,
        vehicle::Vehicle,
    },
    scenario::{data_provider::InMemoryDataProvider, scenario_params::ScenarioOverrides},
};

/// Input of the `solve` operation. Matrices are computed from the locations unless the
/// metric is `custom`.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "SolveRequest")]
pub struct JsonSolveRequest {
    pub orders: Vec<Order>,
    pub vehicles: Vec<Vehicle>,
    pub depot: Depot,
    #[serde(default)]
    pub constraints: ConstraintSet,
    #[serde(default)]
    pub objective: Objective,
    pub metric: Option<TravelMatrixProvider>,
    pub time_limit: Option<SignedDuration>,
}

impl JsonSolveRequest {
    #[instrument(skip_all, level = "debug")]
    pub fn into_solve_request(
        self,
        client: &TravelMatrixClient<impl MatricesCache>,
        default_metric: &TravelMatrixProvider,
    ) -> Result<SolveRequest, MatrixError> {
        let metric = self.metric.as_ref().unwrap_or(default_metric);
        let matrices = engine::travel_matrices(client, metric, &self.depot, &self.orders)?;

        Ok(SolveRequest {
            orders: self.orders,
            vehicles: self.vehicles,
            depot: self.depot,
            matrices,
            constraints: self.constraints,
            objective: self.objective,
            time_limit: self.time_limit,
        })
    }
}

/// Records the scenario engine resolves ids against.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "Dataset")]
pub struct JsonDataset {
    pub orders: Vec<Order>,
    pub vehicles: Vec<Vehicle>,
    pub depot: Depot,
}

impl JsonDataset {
    pub fn order_ids(&self) -> Vec<String> {
        self.orders.iter().map(|order| order.id.clone()).collect()
    }

    pub fn vehicle_ids(&self) -> Vec<String> {
        self.vehicles
            .iter()
            .map(|vehicle| vehicle.id.clone())
            .collect()
    }
}

impl From<JsonDataset> for InMemoryDataProvider {
    fn from(dataset: JsonDataset) -> Self {
        InMemoryDataProvider::new(dataset.orders, dataset.vehicles, Some(dataset.depot))
    }
}

/// Input of the `compareScenarios` operation. Missing id lists select the whole dataset.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "ScenarioRequest")]
pub struct JsonScenarioRequest {
    pub order_ids: Option<Vec<String>>,
    pub vehicle_ids: Option<Vec<String>>,
    pub scenarios: BTreeMap<String, ScenarioOverrides>,
}
