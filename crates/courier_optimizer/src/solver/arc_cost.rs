use std::iter;

use crate::problem::{
    node::{DEPOT, NodeIdx},
    travel_cost_matrix::Cost,
    vehicle::VehicleIdx,
    vehicle_routing_problem::VehicleRoutingProblem,
};

/// Weight of traversing an arc with a given vehicle.
pub trait ArcCost {
    fn arc_cost(&self, vehicle: VehicleIdx, from: NodeIdx, to: NodeIdx) -> Cost;

    /// Charged once per route serving at least one node.
    fn fixed_cost(&self, vehicle: VehicleIdx) -> Cost;

    /// Sum of the arcs along consecutive nodes.
    fn path_cost<I>(&self, vehicle: VehicleIdx, nodes: I) -> Cost
    where
        I: IntoIterator<Item = NodeIdx>,
    {
        let mut nodes = nodes.into_iter();
        let Some(mut previous) = nodes.next() else {
            return 0.0;
        };

        let mut cost = 0.0;
        for node in nodes {
            cost += self.arc_cost(vehicle, previous, node);
            previous = node;
        }
        cost
    }

    /// Cost of a whole route leaving from and returning to the depot, zero when empty.
    fn route_cost<I>(&self, vehicle: VehicleIdx, nodes: I) -> Cost
    where
        I: IntoIterator<Item = NodeIdx>,
    {
        let mut nodes = nodes.into_iter().peekable();
        if nodes.peek().is_none() {
            return 0.0;
        }

        self.fixed_cost(vehicle)
            + self.path_cost(
                vehicle,
                iter::once(DEPOT).chain(nodes).chain(iter::once(DEPOT)),
            )
    }
}

impl ArcCost for VehicleRoutingProblem {
    #[inline]
    fn arc_cost(&self, vehicle: VehicleIdx, from: NodeIdx, to: NodeIdx) -> Cost {
        self.travel_cost(vehicle, from, to)
    }

    #[inline]
    fn fixed_cost(&self, vehicle: VehicleIdx) -> Cost {
        self.fixed_route_cost(vehicle)
    }
}

/// Penalty counters of the guided local search, kept symmetric.
#[derive(Debug, Clone)]
pub struct ArcPenalties {
    counts: Vec<u32>,
    num_nodes: usize,
}

impl ArcPenalties {
    pub fn new(num_nodes: usize) -> Self {
        ArcPenalties {
            counts: vec![0; num_nodes * num_nodes],
            num_nodes,
        }
    }

    #[inline(always)]
    pub fn get(&self, from: NodeIdx, to: NodeIdx) -> u32 {
        self.counts[from.get() * self.num_nodes + to.get()]
    }

    pub fn penalize(&mut self, from: NodeIdx, to: NodeIdx) {
        self.counts[from.get() * self.num_nodes + to.get()] += 1;
        if from != to {
            self.counts[to.get() * self.num_nodes + from.get()] += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&count| count as u64).sum()
    }
}

/// Augmented cost `c + lambda * p` used while escaping local optima.
pub struct PenalizedArcCost<'a> {
    problem: &'a VehicleRoutingProblem,
    penalties: &'a ArcPenalties,
    lambda: f64,
}

impl<'a> PenalizedArcCost<'a> {
    pub fn new(problem: &'a VehicleRoutingProblem, penalties: &'a ArcPenalties, lambda: f64) -> Self {
        PenalizedArcCost {
            problem,
            penalties,
            lambda,
        }
    }
}

impl ArcCost for PenalizedArcCost<'_> {
    #[inline]
    fn arc_cost(&self, vehicle: VehicleIdx, from: NodeIdx, to: NodeIdx) -> Cost {
        self.problem.travel_cost(vehicle, from, to)
            + self.lambda * self.penalties.get(from, to) as f64
    }

    #[inline]
    fn fixed_cost(&self, vehicle: VehicleIdx) -> Cost {
        self.problem.fixed_route_cost(vehicle)
    }
}
