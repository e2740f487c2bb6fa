use std::sync::Arc;

use courier_matrix_providers::travel_matrices::TravelMatrices;

use crate::{
    problem::{
        constraint_set::ConstraintSet,
        depot::Depot,
        location::Location,
        node::NodeIdx,
        objective::Objective,
        order::{Order, Priority},
        time_window::TimeWindow,
        vehicle::Vehicle,
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    },
    solver::{
        insertion::Insertion,
        solution::{route_id::RouteIdx, working_solution::WorkingSolution},
    },
};

pub const TEST_SPEED_KMH: f64 = 50.0;

pub struct TestOrder {
    pub demand: f64,
    pub time_window: (i64, i64),
    pub service_time: i64,
    pub cold_chain: bool,
}

impl TestOrder {
    pub fn new(demand: f64, time_window: (i64, i64)) -> Self {
        TestOrder {
            demand,
            time_window,
            service_time: 0,
            cold_chain: false,
        }
    }

    pub fn with_service_time(mut self, service_time: i64) -> Self {
        self.service_time = service_time;
        self
    }

    pub fn cold_chain(mut self) -> Self {
        self.cold_chain = true;
        self
    }
}

pub fn create_order(id: &str, demand: f64, (start, end): (i64, i64)) -> Order {
    Order {
        id: id.to_owned(),
        customer_id: format!("C-{id}"),
        demand,
        service_time: 0,
        time_window: TimeWindow::new(start, end),
        location: Location::new(40.0, -74.0),
        cold_chain: false,
        priority: Priority::Medium,
    }
}

/// Locations on a line, `spacing` km apart, times at 50 km/h floored to minutes.
pub fn create_line_matrices(num_locations: usize, spacing: f64) -> TravelMatrices {
    let mut distances = Vec::with_capacity(num_locations * num_locations);
    for i in 0..num_locations {
        for j in 0..num_locations {
            distances.push(i.abs_diff(j) as f64 * spacing);
        }
    }

    let times = distances
        .iter()
        .map(|distance| (distance * 60.0 / TEST_SPEED_KMH).floor())
        .collect();

    TravelMatrices {
        distances,
        times,
        costs: None,
    }
}

fn create_orders(orders: Vec<TestOrder>) -> Vec<Order> {
    orders
        .into_iter()
        .enumerate()
        .map(|(index, test_order)| {
            let mut order = create_order(
                &format!("O{}", index + 1),
                test_order.demand,
                test_order.time_window,
            );
            order.service_time = test_order.service_time;
            order.cold_chain = test_order.cold_chain;
            order.location = Location::new(40.0, -74.0 + 0.1 * (index + 1) as f64);
            order
        })
        .collect()
}

fn create_vehicles(capacities: Vec<f64>) -> Vec<Vehicle> {
    capacities
        .into_iter()
        .enumerate()
        .map(|(index, capacity)| Vehicle::new(format!("V{}", index + 1), capacity))
        .collect()
}

fn create_builder(
    orders: Vec<TestOrder>,
    capacities: Vec<f64>,
    matrices: TravelMatrices,
) -> VehicleRoutingProblemBuilder {
    let mut builder = VehicleRoutingProblemBuilder::default();
    builder
        .set_depot(Depot::new("D1", Location::new(40.0, -74.0)))
        .set_orders(create_orders(orders))
        .set_vehicles(create_vehicles(capacities))
        .set_travel_matrices(matrices);
    builder
}

/// Depot at 0, order `i` at `10 * i` km on a line, depot open all day.
pub fn create_line_problem(orders: Vec<TestOrder>, capacities: Vec<f64>) -> VehicleRoutingProblem {
    create_line_problem_with_constraints(orders, capacities, ConstraintSet::default())
}

pub fn create_line_problem_with_constraints(
    orders: Vec<TestOrder>,
    capacities: Vec<f64>,
    constraints: ConstraintSet,
) -> VehicleRoutingProblem {
    let matrices = create_line_matrices(orders.len() + 1, 10.0);
    let mut builder = create_builder(orders, capacities, matrices);
    builder.set_constraints(constraints);
    builder.build().unwrap()
}

pub fn create_line_problem_with_objective(
    orders: Vec<TestOrder>,
    capacities: Vec<f64>,
    objective: Objective,
) -> VehicleRoutingProblem {
    let matrices = create_line_matrices(orders.len() + 1, 10.0);
    let mut builder = create_builder(orders, capacities, matrices);
    builder.set_objective(objective);
    builder.build().unwrap()
}

pub fn create_problem_with_matrices(
    orders: Vec<TestOrder>,
    capacities: Vec<f64>,
    matrices: TravelMatrices,
) -> VehicleRoutingProblem {
    create_builder(orders, capacities, matrices).build().unwrap()
}

/// `routes[i]` lists the nodes served by vehicle `i`, in order.
pub fn create_test_working_solution(
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<Vec<usize>>,
) -> WorkingSolution {
    let mut solution = WorkingSolution::new(problem);

    for (route_index, nodes) in routes.into_iter().enumerate() {
        for (position, node) in nodes.into_iter().enumerate() {
            solution.insert(&Insertion {
                route_id: RouteIdx::new(route_index),
                position,
                node: NodeIdx::new(node),
            });
        }
    }

    solution
}
