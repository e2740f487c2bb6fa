use crate::{
    problem::{
        node::{DEPOT, NodeIdx},
        travel_cost_matrix::{Distance, Time},
        vehicle::{Vehicle, VehicleIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        arc_cost::ArcCost,
        schedule::{self, Schedule},
    },
};

const CAPACITY_EPSILON: f64 = 1e-9;

/// Sequence of customer nodes served by one vehicle, the depot is implicit at both ends.
#[derive(Clone, Debug)]
pub struct WorkingSolutionRoute {
    pub(crate) vehicle_id: VehicleIdx,
    nodes: Vec<NodeIdx>,
    schedule: Schedule,
    load: f64,
}

impl WorkingSolutionRoute {
    pub fn empty(problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) -> Self {
        let start = schedule::start_time(problem, None);
        WorkingSolutionRoute {
            vehicle_id,
            nodes: Vec::new(),
            schedule: Schedule {
                start,
                service_starts: Vec::new(),
                end: start,
            },
            load: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    pub fn vehicle<'a>(&self, problem: &'a VehicleRoutingProblem) -> &'a Vehicle {
        problem.vehicle(self.vehicle_id)
    }

    pub fn nodes(&self) -> &[NodeIdx] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, position: usize) -> NodeIdx {
        self.nodes[position]
    }

    /// Node before `position`, the depot for the first one.
    #[inline]
    pub fn previous_node(&self, position: usize) -> NodeIdx {
        if position == 0 {
            DEPOT
        } else {
            self.nodes[position - 1]
        }
    }

    /// Node after `position`, the depot past the last one.
    #[inline]
    pub fn next_node(&self, position: usize) -> NodeIdx {
        self.nodes.get(position + 1).copied().unwrap_or(DEPOT)
    }

    /// Node at `position`, the depot past the end.
    #[inline]
    pub fn node_or_depot(&self, position: usize) -> NodeIdx {
        self.nodes.get(position).copied().unwrap_or(DEPOT)
    }

    pub fn position_of(&self, node: NodeIdx) -> Option<usize> {
        self.nodes.iter().position(|&current| current == node)
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn start_time(&self) -> Time {
        self.schedule.start
    }

    pub fn end_time(&self) -> Time {
        self.schedule.end
    }

    pub fn service_start(&self, position: usize) -> Time {
        self.schedule.service_starts[position]
    }

    pub fn duration(&self) -> Time {
        self.schedule.end - self.schedule.start
    }

    /// Objective cost of the route under `costs`, zero when empty.
    pub fn transport_costs<C: ArcCost>(&self, costs: &C) -> f64 {
        costs.route_cost(self.vehicle_id, self.nodes.iter().copied())
    }

    pub fn distance(&self, problem: &VehicleRoutingProblem) -> Distance {
        if self.is_empty() {
            return 0.0;
        }

        let mut distance = 0.0;
        let mut previous = DEPOT;
        for &node in self.nodes.iter().chain(std::iter::once(&DEPOT)) {
            distance += problem.distance(previous, node);
            previous = node;
        }
        distance
    }

    /// Checks whether replacing the nodes in `[start, end)` by `replacement` keeps the route
    /// within capacity and every time window.
    ///
    /// Simulation starts from the cached departure before `start` and stops as soon as a
    /// following node gets its cached service start back. When that fails on time, the
    /// whole route is rescheduled since a different depot departure may still fit.
    pub fn is_valid_change<I>(
        &self,
        problem: &VehicleRoutingProblem,
        replacement: I,
        start: usize,
        end: usize,
    ) -> bool
    where
        I: IntoIterator<Item = NodeIdx>,
        I::IntoIter: Clone,
    {
        let replacement = replacement.into_iter();

        let removed: f64 = self.nodes[start..end]
            .iter()
            .map(|&node| problem.node(node).demand())
            .sum();
        let added: f64 = replacement
            .clone()
            .map(|node| problem.node(node).demand())
            .sum();
        if self.load - removed + added > self.vehicle(problem).capacity + CAPACITY_EPSILON {
            return false;
        }

        self.fits_cached_timing(problem, replacement.clone().peekable(), start, end)
            || self.fits_rescheduled(problem, replacement, start, end)
    }

    fn fits_cached_timing<I>(
        &self,
        problem: &VehicleRoutingProblem,
        mut replacement: std::iter::Peekable<I>,
        start: usize,
        end: usize,
    ) -> bool
    where
        I: Iterator<Item = NodeIdx>,
    {
        let (mut previous, mut time) = if start == 0 {
            let first = replacement
                .peek()
                .copied()
                .or_else(|| self.nodes.get(end).copied());
            (DEPOT, schedule::start_time(problem, first))
        } else {
            let previous = self.nodes[start - 1];
            (
                previous,
                schedule::departure(problem, previous, self.schedule.service_starts[start - 1]),
            )
        };

        for node in replacement {
            let Some(begin) = schedule::service_start(problem, time, previous, node) else {
                return false;
            };
            time = schedule::departure(problem, node, begin);
            previous = node;
        }

        for (position, &node) in self.nodes.iter().enumerate().skip(end) {
            let Some(begin) = schedule::service_start(problem, time, previous, node) else {
                return false;
            };

            // Same service start, the rest of the route is unchanged
            if begin == self.schedule.service_starts[position] {
                return true;
            }

            time = schedule::departure(problem, node, begin);
            previous = node;
        }

        previous == DEPOT || schedule::return_time(problem, time, previous).is_some()
    }

    fn fits_rescheduled<I>(
        &self,
        problem: &VehicleRoutingProblem,
        replacement: I,
        start: usize,
        end: usize,
    ) -> bool
    where
        I: Iterator<Item = NodeIdx>,
    {
        let nodes: Vec<NodeIdx> = self.nodes[..start]
            .iter()
            .copied()
            .chain(replacement)
            .chain(self.nodes[end..].iter().copied())
            .collect();

        schedule::compute_schedule(problem, &nodes).is_some()
    }

    /// Replaces the nodes in `[start, end)`, the change must have been validated first.
    pub fn replace_nodes(
        &mut self,
        problem: &VehicleRoutingProblem,
        replacement: &[NodeIdx],
        start: usize,
        end: usize,
    ) {
        self.nodes.splice(start..end, replacement.iter().copied());
        self.update_data(problem);
    }

    pub fn insert(&mut self, problem: &VehicleRoutingProblem, position: usize, node: NodeIdx) {
        self.replace_nodes(problem, &[node], position, position);
    }

    pub fn remove(&mut self, problem: &VehicleRoutingProblem, position: usize) -> NodeIdx {
        let node = self.nodes[position];
        self.replace_nodes(problem, &[], position, position + 1);
        node
    }

    fn update_data(&mut self, problem: &VehicleRoutingProblem) {
        self.load = self
            .nodes
            .iter()
            .map(|&node| problem.node(node).demand())
            .sum();

        match schedule::compute_schedule(problem, &self.nodes) {
            Some(schedule) => self.schedule = schedule,
            None => panic!(
                "route of vehicle {} has an infeasible schedule",
                self.vehicle_id
            ),
        }
    }
}
