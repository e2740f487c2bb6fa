use crate::problem::{
    node::{DEPOT, NodeIdx},
    travel_cost_matrix::Time,
    vehicle_routing_problem::VehicleRoutingProblem,
};

/// Timing of a route, all values in minutes from midnight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    /// Departure from the depot.
    pub start: Time,
    /// Service start at each visited node.
    pub service_starts: Vec<Time>,
    /// Arrival back at the depot.
    pub end: Time,
}

/// Earliest useful departure from the depot: the first node is reached when its window
/// opens, never before the depot opens.
pub fn start_time(problem: &VehicleRoutingProblem, first: Option<NodeIdx>) -> Time {
    let depot_open = problem.depot_node().time_window().start();
    match first {
        Some(node) => {
            let opening = problem.node(node).time_window().start();
            depot_open.max(opening - problem.travel_time(DEPOT, node))
        }
        None => depot_open,
    }
}

/// Why a node cannot be served at a given arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infeasibility {
    /// The window closed, a later departure cannot help.
    Late,
    /// The idle time exceeds the slack by this many minutes.
    TooEarly(Time),
}

/// Service start at `to` when leaving `from` at `departure`.
#[inline]
pub fn try_service_start(
    problem: &VehicleRoutingProblem,
    departure: Time,
    from: NodeIdx,
    to: NodeIdx,
) -> Result<Time, Infeasibility> {
    let arrival = departure + problem.travel_time(from, to);
    let window = problem.node(to).time_window();

    if arrival > window.end() {
        return Err(Infeasibility::Late);
    }

    let excess = window.waiting_time(arrival) - problem.waiting_slack();
    if excess > 0 {
        return Err(Infeasibility::TooEarly(excess));
    }

    Ok(arrival.max(window.start()))
}

/// Service start at `to` when leaving `from` at `departure`.
/// `None` when the window is missed or the idle time exceeds the slack.
#[inline]
pub fn service_start(
    problem: &VehicleRoutingProblem,
    departure: Time,
    from: NodeIdx,
    to: NodeIdx,
) -> Option<Time> {
    try_service_start(problem, departure, from, to).ok()
}

#[inline]
pub fn departure(problem: &VehicleRoutingProblem, node: NodeIdx, service_start: Time) -> Time {
    service_start + problem.node(node).service_time()
}

/// Arrival at the depot, `None` when it closes first.
#[inline]
pub fn return_time(problem: &VehicleRoutingProblem, departure: Time, last: NodeIdx) -> Option<Time> {
    let arrival = departure + problem.travel_time(last, DEPOT);
    if arrival > problem.depot_node().time_window().end() {
        None
    } else {
        Some(arrival)
    }
}

/// Earliest feasible schedule of a whole route, `None` if no departure from the depot
/// serves every node and returns in time.
///
/// Arrivals never decrease when the departure moves later, so lateness only rules out
/// later departures and excess waiting only earlier ones. Starting from [`start_time`],
/// the departure is pushed back by the excess waiting until the route fits or a node is
/// missed.
pub fn compute_schedule(problem: &VehicleRoutingProblem, nodes: &[NodeIdx]) -> Option<Schedule> {
    let mut start = start_time(problem, nodes.first().copied());
    loop {
        match schedule_from(problem, nodes, start) {
            Ok(schedule) => return Some(schedule),
            Err(Infeasibility::TooEarly(excess)) => start += excess,
            Err(Infeasibility::Late) => return None,
        }
    }
}

/// Forward pass over a whole route leaving the depot at `start`.
fn schedule_from(
    problem: &VehicleRoutingProblem,
    nodes: &[NodeIdx],
    start: Time,
) -> Result<Schedule, Infeasibility> {
    let mut service_starts = Vec::with_capacity(nodes.len());

    let mut previous = DEPOT;
    let mut time = start;
    for &node in nodes {
        let begin = try_service_start(problem, time, previous, node)?;
        service_starts.push(begin);
        time = departure(problem, node, begin);
        previous = node;
    }

    let end = if nodes.is_empty() {
        start
    } else {
        return_time(problem, time, previous).ok_or(Infeasibility::Late)?
    };

    Ok(Schedule {
        start,
        service_starts,
        end,
    })
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{self, TestOrder};

    use super::*;

    fn n(index: usize) -> NodeIdx {
        NodeIdx::new(index)
    }

    #[test]
    fn test_start_aligned_with_first_window() {
        // 10 km spacing at 50 km/h: 12 minutes per hop
        let problem = test_utils::create_line_problem(
            vec![
                TestOrder::new(10.0, (480, 600)),
                TestOrder::new(10.0, (480, 600)),
            ],
            vec![100.0],
        );

        let schedule = compute_schedule(&problem, &[n(1), n(2)]).unwrap();

        assert_eq!(schedule.start, 468);
        assert_eq!(schedule.service_starts, vec![480, 492]);
        assert_eq!(schedule.end, 516);
    }

    #[test]
    fn test_service_time_delays_departure() {
        let problem = test_utils::create_line_problem(
            vec![
                TestOrder::new(10.0, (0, 1440)).with_service_time(15),
                TestOrder::new(10.0, (0, 1440)),
            ],
            vec![100.0],
        );

        let schedule = compute_schedule(&problem, &[n(1), n(2)]).unwrap();

        assert_eq!(schedule.start, 0);
        assert_eq!(schedule.service_starts, vec![12, 39]);
        assert_eq!(schedule.end, 63);
    }

    #[test]
    fn test_waiting_within_slack() {
        let problem = test_utils::create_line_problem(
            vec![
                TestOrder::new(10.0, (480, 600)),
                TestOrder::new(10.0, (520, 600)),
            ],
            vec![100.0],
        );

        // Arrives at 492, waits 28 minutes
        let schedule = compute_schedule(&problem, &[n(1), n(2)]).unwrap();
        assert_eq!(schedule.service_starts, vec![480, 520]);
    }

    #[test]
    fn test_late_window_in_either_order() {
        let problem = test_utils::create_line_problem(
            vec![
                TestOrder::new(10.0, (480, 600)),
                TestOrder::new(10.0, (560, 600)),
            ],
            vec![100.0],
        );

        // Leaving at 468 idles 68 minutes at node 2, leaving at 506 only 30
        let schedule = compute_schedule(&problem, &[n(1), n(2)]).unwrap();
        assert_eq!(schedule.start, 506);
        assert_eq!(schedule.service_starts, vec![518, 560]);

        // Reversed, node 1 is reached at 572, inside its window
        let schedule = compute_schedule(&problem, &[n(2), n(1)]).unwrap();
        assert_eq!(schedule.start, 536);
        assert_eq!(schedule.service_starts, vec![560, 572]);
    }

    #[test]
    fn test_departure_delayed_to_respect_slack() {
        let problem = test_utils::create_line_problem(
            vec![
                TestOrder::new(10.0, (480, 600)).with_service_time(10),
                TestOrder::new(10.0, (620, 720)),
            ],
            vec![100.0],
        );

        // Leaving at 468 would idle 118 minutes at node 2, leaving at 556 idles 30
        let schedule = compute_schedule(&problem, &[n(1), n(2)]).unwrap();

        assert_eq!(schedule.start, 556);
        assert_eq!(schedule.service_starts, vec![568, 620]);
        assert_eq!(schedule.end, 644);
    }

    #[test]
    fn test_delay_limited_by_earlier_window() {
        let problem = test_utils::create_line_problem(
            vec![
                TestOrder::new(10.0, (480, 500)),
                TestOrder::new(10.0, (620, 720)),
            ],
            vec![100.0],
        );

        // Node 1 closes at 500, so node 2 would still idle 108 minutes
        assert!(compute_schedule(&problem, &[n(1), n(2)]).is_none());
    }

    #[test]
    fn test_late_arrival_is_infeasible() {
        let problem = test_utils::create_line_problem(
            vec![
                TestOrder::new(10.0, (480, 500)),
                TestOrder::new(10.0, (0, 485)),
            ],
            vec![100.0],
        );

        assert!(compute_schedule(&problem, &[n(1), n(2)]).is_none());
        assert!(compute_schedule(&problem, &[n(2)]).is_some());
    }

    #[test]
    fn test_empty_route() {
        let problem =
            test_utils::create_line_problem(vec![TestOrder::new(10.0, (0, 1440))], vec![100.0]);

        let schedule = compute_schedule(&problem, &[]).unwrap();
        assert_eq!(schedule.start, schedule.end);
        assert!(schedule.service_starts.is_empty());
    }
}
