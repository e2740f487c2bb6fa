use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    economics::economics_params::EconomicsParams,
    problem::vehicle::VehicleCostProfile,
    solution_set::RoutePlan,
    utils::rounding::{round2, round_to},
};

/// What the economics of a route depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEconomicsInput {
    pub vehicle_id: String,
    pub distance_km: f64,
    pub time_minutes: f64,
    pub deliveries: usize,
    pub vehicle: VehicleCostProfile,
}

impl From<&RoutePlan> for RouteEconomicsInput {
    fn from(plan: &RoutePlan) -> Self {
        RouteEconomicsInput {
            vehicle_id: plan.vehicle_id.clone(),
            distance_km: plan.total_distance_km,
            time_minutes: plan.total_time_minutes as f64,
            deliveries: plan.num_deliveries(),
            vehicle: plan.vehicle,
        }
    }
}

impl RouteEconomicsInput {
    /// Stretches the route time, used to model slower traffic.
    pub fn with_time_multiplier(mut self, multiplier: f64) -> Self {
        self.time_minutes *= multiplier;
        self
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct RouteCostBreakdown {
    pub vehicle_id: String,
    pub distance_km: f64,
    pub time_hours: f64,
    pub fuel_cost: f64,
    pub labor_cost: f64,
    /// Labor cost if hours beyond the regular shift were paid at the overtime rate.
    pub labor_cost_with_overtime: f64,
    pub fixed_cost: f64,
    pub variable_cost: f64,
    pub total_cost: f64,
    pub emissions_kg: f64,
    pub deliveries: usize,
    pub cost_per_delivery: f64,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct FleetEconomics {
    pub total_cost: f64,
    pub fuel_cost: f64,
    pub labor_cost: f64,
    pub fixed_cost: f64,
    pub variable_cost: f64,
    pub total_distance_km: f64,
    pub total_time_hours: f64,
    pub total_emissions_kg: f64,
    pub cost_per_km: f64,
    pub cost_per_delivery: f64,
    pub emissions_per_km: f64,
    pub total_deliveries: usize,
    pub num_routes: usize,
    pub parameters: EconomicsParams,
    pub per_route_breakdown: Vec<RouteCostBreakdown>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
pub struct LaborCost {
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub regular_cost: f64,
    pub overtime_cost: f64,
    pub total_cost: f64,
}

/// Liters burnt over `distance_km`.
pub fn fuel_consumption(distance_km: f64, efficiency_km_per_liter: f64) -> f64 {
    distance_km / efficiency_km_per_liter
}

/// kg of CO2 emitted over `distance_km`.
pub fn carbon_footprint(distance_km: f64, emissions_factor: f64) -> f64 {
    distance_km * emissions_factor
}

/// Hours beyond `regular_hours` are paid `overtime_multiplier` times the wage.
pub fn overtime_labor_cost(
    time_hours: f64,
    regular_hours: f64,
    wage: f64,
    overtime_multiplier: f64,
) -> LaborCost {
    if time_hours <= regular_hours {
        return LaborCost {
            regular_hours: time_hours,
            overtime_hours: 0.0,
            regular_cost: time_hours * wage,
            overtime_cost: 0.0,
            total_cost: time_hours * wage,
        };
    }

    let overtime_hours = time_hours - regular_hours;
    let regular_cost = regular_hours * wage;
    let overtime_cost = overtime_hours * wage * overtime_multiplier;

    LaborCost {
        regular_hours,
        overtime_hours,
        regular_cost,
        overtime_cost,
        total_cost: regular_cost + overtime_cost,
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[derive(Default)]
struct Totals {
    distance: f64,
    time_minutes: f64,
    fuel: f64,
    labor: f64,
    fixed: f64,
    variable: f64,
    emissions: f64,
    deliveries: usize,
}

/// Aggregates fuel, labor, fixed and variable costs plus emissions over `routes`.
pub fn evaluate(routes: &[RouteEconomicsInput], params: &EconomicsParams) -> FleetEconomics {
    let mut totals = Totals::default();
    let mut per_route_breakdown = Vec::with_capacity(routes.len());

    for route in routes {
        let time_hours = route.time_minutes / 60.0;
        let fuel = fuel_consumption(route.distance_km, params.fuel_efficiency_km_per_liter)
            * params.fuel_price_per_liter;
        let labor = time_hours * params.driver_wage_per_hour;
        let fixed = route.vehicle.fixed_cost;
        let variable = route.distance_km * route.vehicle.cost_per_km;
        let total = fuel + labor + fixed + variable;
        let emissions = carbon_footprint(route.distance_km, route.vehicle.emissions_factor);
        let with_overtime = overtime_labor_cost(
            time_hours,
            params.regular_hours,
            params.driver_wage_per_hour,
            params.overtime_multiplier,
        );

        totals.distance += route.distance_km;
        totals.time_minutes += route.time_minutes;
        totals.fuel += fuel;
        totals.labor += labor;
        totals.fixed += fixed;
        totals.variable += variable;
        totals.emissions += emissions;
        totals.deliveries += route.deliveries;

        per_route_breakdown.push(RouteCostBreakdown {
            vehicle_id: route.vehicle_id.clone(),
            distance_km: round2(route.distance_km),
            time_hours: round2(time_hours),
            fuel_cost: round2(fuel),
            labor_cost: round2(labor),
            labor_cost_with_overtime: round2(with_overtime.total_cost),
            fixed_cost: round2(fixed),
            variable_cost: round2(variable),
            total_cost: round2(total),
            emissions_kg: round2(emissions),
            deliveries: route.deliveries,
            cost_per_delivery: round2(ratio(total, route.deliveries as f64)),
        });
    }

    let total_cost = totals.fuel + totals.labor + totals.fixed + totals.variable;

    debug!(
        routes = routes.len(),
        total_cost,
        distance_km = totals.distance,
        emissions_kg = totals.emissions,
        "Evaluated route economics"
    );

    FleetEconomics {
        total_cost: round2(total_cost),
        fuel_cost: round2(totals.fuel),
        labor_cost: round2(totals.labor),
        fixed_cost: round2(totals.fixed),
        variable_cost: round2(totals.variable),
        total_distance_km: round2(totals.distance),
        total_time_hours: round2(totals.time_minutes / 60.0),
        total_emissions_kg: round2(totals.emissions),
        cost_per_km: round2(ratio(total_cost, totals.distance)),
        cost_per_delivery: round2(ratio(total_cost, totals.deliveries as f64)),
        emissions_per_km: round_to(ratio(totals.emissions, totals.distance), 3),
        total_deliveries: totals.deliveries,
        num_routes: routes.len(),
        parameters: *params,
        per_route_breakdown,
    }
}
