use courier_matrix_providers::travel_matrices::TravelMatrices;
use fxhash::FxHashSet;
use tracing::{debug, warn};

use crate::solver::solver_params::{DEFAULT_DROP_PENALTY, DEFAULT_WAITING_SLACK_MINUTES};

use super::{
    constraint_set::ConstraintSet,
    depot::Depot,
    node::{DEPOT, Node, NodeIdx},
    objective::Objective,
    order::Order,
    problem_error::ProblemError,
    travel_cost_matrix::{Cost, Distance, Time, TravelCostMatrix},
    vehicle::{Vehicle, VehicleIdx},
};

/// Solver-ready problem: node 0 is the depot, nodes `1..` are the orders in input order.
pub struct VehicleRoutingProblem {
    depot: Depot,
    nodes: Vec<Node>,
    vehicles: Vec<Vehicle>,
    matrix: TravelCostMatrix,
    objective: Objective,

    /// Longest idle time allowed before a window opens, in minutes
    waiting_slack: Time,
    drop_penalty: Cost,

    has_optional_nodes: bool,
}

impl VehicleRoutingProblem {
    pub fn depot(&self) -> &Depot {
        &self.depot
    }

    pub fn depot_node(&self) -> &Node {
        &self.nodes[DEPOT]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, node: NodeIdx) -> &Node {
        &self.nodes[node]
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Every node except the depot.
    pub fn customers(&self) -> impl Iterator<Item = NodeIdx> + use<> {
        (1..self.nodes.len()).map(NodeIdx::new)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, vehicle: VehicleIdx) -> &Vehicle {
        &self.vehicles[vehicle]
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn waiting_slack(&self) -> Time {
        self.waiting_slack
    }

    pub fn drop_penalty(&self) -> Cost {
        self.drop_penalty
    }

    pub fn has_optional_nodes(&self) -> bool {
        self.has_optional_nodes
    }

    pub fn is_symmetric(&self) -> bool {
        self.matrix.is_symmetric()
    }

    #[inline(always)]
    pub fn distance(&self, from: NodeIdx, to: NodeIdx) -> Distance {
        self.matrix.distance(from, to)
    }

    #[inline(always)]
    pub fn travel_time(&self, from: NodeIdx, to: NodeIdx) -> Time {
        self.matrix.time(from, to)
    }

    /// Arc weight under the selected objective.
    #[inline]
    pub fn travel_cost(&self, vehicle: VehicleIdx, from: NodeIdx, to: NodeIdx) -> Cost {
        match self.objective {
            Objective::MinimizeDistance => self.distance(from, to),
            Objective::MinimizeTime => self.travel_time(from, to) as Cost,
            Objective::MinimizeCost => {
                self.distance(from, to) * self.vehicles[vehicle].cost_per_km
            }
            Objective::MinimizeEmissions => {
                self.distance(from, to) * self.vehicles[vehicle].emissions_factor
            }
        }
    }

    /// Cost charged once when the vehicle serves at least one node.
    #[inline]
    pub fn fixed_route_cost(&self, vehicle: VehicleIdx) -> Cost {
        match self.objective {
            Objective::MinimizeCost => self.vehicles[vehicle].fixed_cost,
            _ => 0.0,
        }
    }
}

#[derive(Default)]
pub struct VehicleRoutingProblemBuilder {
    depot: Option<Depot>,
    orders: Vec<Order>,
    vehicles: Vec<Vehicle>,
    matrices: Option<TravelMatrices>,
    constraints: Option<ConstraintSet>,
    objective: Objective,
    waiting_slack: Option<Time>,
    drop_penalty: Option<Cost>,
}

impl VehicleRoutingProblemBuilder {
    pub fn set_depot(&mut self, depot: Depot) -> &mut Self {
        self.depot = Some(depot);
        self
    }

    pub fn set_orders(&mut self, orders: Vec<Order>) -> &mut Self {
        self.orders = orders;
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut Self {
        self.vehicles = vehicles;
        self
    }

    /// Depot first, then the orders in the same order as `set_orders`.
    pub fn set_travel_matrices(&mut self, matrices: TravelMatrices) -> &mut Self {
        self.matrices = Some(matrices);
        self
    }

    pub fn set_constraints(&mut self, constraints: ConstraintSet) -> &mut Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn set_objective(&mut self, objective: Objective) -> &mut Self {
        self.objective = objective;
        self
    }

    pub fn set_waiting_slack(&mut self, minutes: Time) -> &mut Self {
        self.waiting_slack = Some(minutes);
        self
    }

    pub fn set_drop_penalty(&mut self, penalty: Cost) -> &mut Self {
        self.drop_penalty = Some(penalty);
        self
    }

    pub fn build(self) -> Result<VehicleRoutingProblem, ProblemError> {
        let depot = self.depot.ok_or_else(|| ProblemError::InvalidDepot {
            id: String::new(),
            reason: String::from("missing depot"),
        })?;
        depot.validate()?;

        let constraints = self.constraints.unwrap_or_default();
        constraints.validate()?;

        if self.orders.is_empty() {
            return Err(ProblemError::NoOrders);
        }

        let mut seen = FxHashSet::default();
        for order in &self.orders {
            order.validate()?;
            if !seen.insert(order.id.as_str()) {
                return Err(ProblemError::DuplicateOrder(order.id.clone()));
            }
        }

        for excluded in &constraints.excluded_order_ids {
            if !seen.contains(excluded.as_str()) {
                warn!(order_id = %excluded, "Excluded order is not part of the problem, ignoring");
            }
        }

        let mut vehicles = Vec::with_capacity(self.vehicles.len());
        for vehicle in self.vehicles {
            vehicle.validate()?;
            if vehicle.available {
                vehicles.push(vehicle);
            } else {
                warn!(vehicle_id = %vehicle.id, "Vehicle is not available, skipping");
            }
        }

        if vehicles.is_empty() {
            return Err(ProblemError::NoAvailableVehicles);
        }

        let matrices = self.matrices.ok_or(ProblemError::MissingMatrices)?;
        let matrix = TravelCostMatrix::from_travel_matrices(&matrices, self.orders.len() + 1)?;

        let mut nodes = Vec::with_capacity(self.orders.len() + 1);
        nodes.push(Node {
            external_id: depot.id.clone(),
            demand: 0.0,
            service_time: 0,
            time_window: depot.operating_window,
            cold_chain: false,
            optional: false,
        });

        nodes.extend(self.orders.iter().map(|order| Node {
            external_id: order.id.clone(),
            demand: order.demand,
            service_time: order.service_time,
            time_window: order.time_window,
            cold_chain: order.cold_chain,
            optional: constraints.is_excluded(&order.id),
        }));

        let has_optional_nodes = nodes.iter().any(|node| node.optional);

        debug!(
            nodes = nodes.len(),
            vehicles = vehicles.len(),
            optional = nodes.iter().filter(|node| node.optional).count(),
            "Built vehicle routing problem"
        );

        Ok(VehicleRoutingProblem {
            depot,
            nodes,
            vehicles,
            matrix,
            objective: self.objective,
            waiting_slack: self.waiting_slack.unwrap_or(DEFAULT_WAITING_SLACK_MINUTES),
            drop_penalty: self.drop_penalty.unwrap_or(DEFAULT_DROP_PENALTY),
            has_optional_nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{location::Location, time_window::TimeWindow},
        test_utils,
    };

    use super::*;

    fn builder() -> VehicleRoutingProblemBuilder {
        let orders = vec![
            test_utils::create_order("O1", 10.0, (480, 720)),
            test_utils::create_order("O2", 20.0, (480, 720)),
        ];
        let depot = Depot::new("D1", Location::new(40.0, -74.0));
        let matrices = test_utils::create_line_matrices(3, 10.0);

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder
            .set_depot(depot)
            .set_orders(orders)
            .set_vehicles(vec![Vehicle::new("V1", 100.0)])
            .set_travel_matrices(matrices);
        builder
    }

    #[test]
    fn test_depot_is_node_zero() {
        let problem = builder().build().unwrap();

        assert_eq!(problem.num_nodes(), 3);
        assert_eq!(problem.depot_node().external_id(), "D1");
        assert_eq!(problem.depot_node().demand(), 0.0);
        assert_eq!(*problem.depot_node().time_window(), TimeWindow::full_day());
        assert_eq!(problem.node(NodeIdx::new(2)).external_id(), "O2");
        assert_eq!(
            problem.customers().collect::<Vec<_>>(),
            vec![NodeIdx::new(1), NodeIdx::new(2)]
        );
    }

    #[test]
    fn test_excluded_orders_are_optional() {
        let mut builder = builder();
        builder.set_constraints(ConstraintSet {
            excluded_order_ids: vec![String::from("O2"), String::from("UNKNOWN")],
            ..ConstraintSet::default()
        });

        let problem = builder.build().unwrap();

        assert!(!problem.node(NodeIdx::new(1)).is_optional());
        assert!(problem.node(NodeIdx::new(2)).is_optional());
        assert!(problem.has_optional_nodes());
    }

    #[test]
    fn test_unavailable_vehicles_are_filtered() {
        let mut builder = builder();
        let mut unavailable = Vehicle::new("V2", 100.0);
        unavailable.available = false;
        builder.set_vehicles(vec![Vehicle::new("V1", 100.0), unavailable.clone()]);

        let problem = builder.build().unwrap();
        assert_eq!(problem.vehicles().len(), 1);

        let mut builder = self::builder();
        builder.set_vehicles(vec![unavailable]);
        assert!(matches!(builder.build(), Err(ProblemError::NoAvailableVehicles)));
    }

    #[test]
    fn test_matrix_dimension_mismatch() {
        let mut builder = builder();
        builder.set_travel_matrices(test_utils::create_line_matrices(2, 10.0));

        assert!(matches!(builder.build(), Err(ProblemError::Matrix(_))));
    }

    #[test]
    fn test_duplicate_orders() {
        let mut builder = builder();
        builder.set_orders(vec![
            test_utils::create_order("O1", 10.0, (480, 720)),
            test_utils::create_order("O1", 20.0, (480, 720)),
        ]);

        assert!(matches!(builder.build(), Err(ProblemError::DuplicateOrder(id)) if id == "O1"));
    }

    #[test]
    fn test_travel_cost_follows_objective() {
        let mut vehicle = Vehicle::new("V1", 100.0);
        vehicle.cost_per_km = 3.0;
        vehicle.emissions_factor = 0.5;

        let from = NodeIdx::new(0);
        let to = NodeIdx::new(2);

        for (objective, expected, fixed) in [
            (Objective::MinimizeDistance, 20.0, 0.0),
            (Objective::MinimizeTime, 24.0, 0.0),
            (Objective::MinimizeCost, 60.0, 50.0),
            (Objective::MinimizeEmissions, 10.0, 0.0),
        ] {
            let mut builder = builder();
            builder
                .set_vehicles(vec![vehicle.clone()])
                .set_objective(objective);
            let problem = builder.build().unwrap();
            let v = VehicleIdx::new(0);

            assert_eq!(problem.travel_cost(v, from, to), expected);
            assert_eq!(problem.fixed_route_cost(v), fixed);
        }
    }
}
