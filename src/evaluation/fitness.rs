use crate::domain::types::{Location, Route};

/// Euclidean distance between two locations.
pub fn distance(a: &Location, b: &Location) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Time at which a vehicle leaving `a` at `cost_so_far` is done serving `b`.
///
/// Travel takes `distance(a, b)`, arriving before `b.ready_time` means waiting,
/// and `b.service` is added on top.
pub fn cost_to(a: &Location, b: &Location, cost_so_far: f64) -> f64 {
    let arrival = cost_so_far + distance(a, b);
    arrival + (b.ready_time - arrival).max(0.0) + b.service
}

/// Cost of warehouse -> customers -> warehouse, accumulated left to right.
pub fn find_route_cost(route: &Route) -> f64 {
    let mut current = &route.warehouse;
    let mut cost = 0.0;
    for customer in &route.customers {
        cost = cost_to(current, customer, cost);
        current = customer;
    }

    if route.customers.is_empty() {
        return 0.0;
    }
    cost_to(current, &route.warehouse, cost)
}

/// Pure travel distance of a route including both warehouse legs.
pub fn find_route_length(route: &Route) -> f64 {
    let r = &route.customers;
    if r.is_empty() {
        return 0.0;
    }

    let warehouse_to_first_loc = distance(&route.warehouse, &r[0]);
    let last_loc_to_warehouse = distance(&r[r.len() - 1], &route.warehouse);

    let mut total_dist = 0.0;
    for i in 0..r.len() - 1 {
        total_dist += distance(&r[i], &r[i + 1]);
    }

    warehouse_to_first_loc + total_dist + last_loc_to_warehouse
}

pub fn find_solution_cost(routes: &[Route]) -> f64 {
    routes.iter().map(find_route_cost).sum()
}
