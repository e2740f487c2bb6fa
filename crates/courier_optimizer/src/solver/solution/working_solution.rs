use std::{collections::BTreeSet, sync::Arc};

use crate::{
    problem::{
        node::NodeIdx, vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        arc_cost::ArcCost,
        insertion::Insertion,
        score::Score,
        solution::{route::WorkingSolutionRoute, route_id::RouteIdx},
    },
};

#[derive(Clone)]
pub struct WorkingSolution {
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<WorkingSolutionRoute>,
    // Ordered so that every scan over unassigned nodes is deterministic
    unassigned: BTreeSet<NodeIdx>,
}

impl WorkingSolution {
    /// One empty route per vehicle, every customer unassigned.
    pub fn new(problem: Arc<VehicleRoutingProblem>) -> Self {
        let routes = (0..problem.vehicles().len())
            .map(|vehicle| WorkingSolutionRoute::empty(&problem, VehicleIdx::new(vehicle)))
            .collect();
        let unassigned = problem.customers().collect();

        WorkingSolution {
            problem,
            routes,
            unassigned,
        }
    }

    pub fn problem(&self) -> &VehicleRoutingProblem {
        self.problem.as_ref()
    }

    pub fn routes(&self) -> &[WorkingSolutionRoute] {
        &self.routes
    }

    pub fn route(&self, route_id: RouteIdx) -> &WorkingSolutionRoute {
        &self.routes[route_id]
    }

    pub fn route_ids(&self) -> impl Iterator<Item = RouteIdx> + use<> {
        (0..self.routes.len()).map(RouteIdx::new)
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = &WorkingSolutionRoute> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    pub fn non_empty_routes_count(&self) -> usize {
        self.non_empty_routes_iter().count()
    }

    pub fn unassigned(&self) -> &BTreeSet<NodeIdx> {
        &self.unassigned
    }

    pub fn is_unassigned(&self, node: NodeIdx) -> bool {
        self.unassigned.contains(&node)
    }

    pub fn unassigned_required_count(&self) -> usize {
        self.unassigned
            .iter()
            .filter(|&&node| !self.problem.node(node).is_optional())
            .count()
    }

    pub fn unassigned_optional_count(&self) -> usize {
        self.unassigned.len() - self.unassigned_required_count()
    }

    pub fn insert(&mut self, insertion: &Insertion) {
        self.routes[insertion.route_id].insert(&self.problem, insertion.position, insertion.node);
        self.unassigned.remove(&insertion.node);
    }

    pub fn remove(&mut self, route_id: RouteIdx, position: usize) -> NodeIdx {
        let node = self.routes[route_id].remove(&self.problem, position);
        self.unassigned.insert(node);
        node
    }

    pub fn replace_route_nodes(
        &mut self,
        route_id: RouteIdx,
        replacement: &[NodeIdx],
        start: usize,
        end: usize,
    ) {
        self.routes[route_id].replace_nodes(&self.problem, replacement, start, end);
    }

    /// Sum of the route costs under `costs`.
    pub fn transport_costs<C: ArcCost>(&self, costs: &C) -> f64 {
        self.non_empty_routes_iter()
            .map(|route| route.transport_costs(costs))
            .sum()
    }

    /// Unassigned required nodes as hard score, objective plus drop penalties as soft score.
    pub fn score(&self) -> Score {
        let dropped = self.unassigned_optional_count() as f64;
        Score::new(
            self.unassigned_required_count() as f64,
            self.transport_costs(self.problem.as_ref()) + dropped * self.problem.drop_penalty(),
        )
    }

    pub fn total_distance(&self) -> f64 {
        self.non_empty_routes_iter()
            .map(|route| route.distance(&self.problem))
            .sum()
    }
}
