#![allow(dead_code)]

use courier_matrix_providers::{
    cache::MemoryMatricesCache, travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
};
use courier_optimizer::{
    engine::{self, EngineConfig, SolveRequest},
    problem::{
        constraint_set::ConstraintSet,
        depot::Depot,
        location::Location,
        objective::Objective,
        order::{Order, Priority},
        time_window::TimeWindow,
        vehicle::Vehicle,
    },
    scenario::data_provider::InMemoryDataProvider,
    solver::solver_params::{SolverParams, Termination, Threads},
};

pub const DEPOT: Location = Location {
    latitude: 40.7128,
    longitude: -74.0060,
};

pub fn config() -> EngineConfig {
    EngineConfig {
        solver: SolverParams {
            terminations: vec![
                Termination::IterationsWithoutImprovement(20),
                Termination::Iterations(50),
            ],
            ..SolverParams::default()
        },
        parallelism: Threads::Multi(2),
        ..EngineConfig::default()
    }
}

pub fn create_order(id: &str, demand: f64, offset: (f64, f64), window: (i64, i64)) -> Order {
    Order {
        id: id.to_owned(),
        customer_id: format!("C-{id}"),
        demand,
        service_time: 10,
        time_window: TimeWindow::new(window.0, window.1),
        location: Location::new(DEPOT.latitude + offset.0, DEPOT.longitude + offset.1),
        cold_chain: false,
        priority: Priority::Medium,
    }
}

/// Orders scattered around the depot, all open from 8:00 to 18:00.
pub fn create_orders(demands: &[f64]) -> Vec<Order> {
    demands
        .iter()
        .enumerate()
        .map(|(index, &demand)| {
            let angle = index as f64 * 1.3;
            let radius = 0.02 + 0.01 * (index % 4) as f64;
            create_order(
                &format!("O{:03}", index + 1),
                demand,
                (radius * angle.sin(), radius * angle.cos()),
                (480, 1080),
            )
        })
        .collect()
}

pub fn create_vehicles(capacities: &[f64]) -> Vec<Vehicle> {
    capacities
        .iter()
        .enumerate()
        .map(|(index, &capacity)| Vehicle::new(format!("V{:03}", index + 1), capacity))
        .collect()
}

pub fn create_depot() -> Depot {
    Depot::new("D001", DEPOT)
}

pub fn create_solve_request(
    orders: Vec<Order>,
    vehicles: Vec<Vehicle>,
    constraints: ConstraintSet,
) -> SolveRequest {
    let depot = create_depot();
    let client = TravelMatrixClient::new(MemoryMatricesCache::new());
    let matrices =
        engine::travel_matrices(&client, &TravelMatrixProvider::default(), &depot, &orders)
            .unwrap();

    SolveRequest {
        orders,
        vehicles,
        depot,
        matrices,
        constraints,
        objective: Objective::MinimizeDistance,
        time_limit: None,
    }
}

pub fn create_provider(orders: Vec<Order>, vehicles: Vec<Vehicle>) -> InMemoryDataProvider {
    InMemoryDataProvider::new(orders, vehicles, Some(create_depot()))
}
