use std::collections::HashMap;

use itertools::Itertools;

use crate::domain::error::SolverError;
use crate::domain::types::{Location, ProblemInstance, Route, Solution};
use crate::evaluation::fitness::{
    distance, find_route_cost, find_route_length, find_solution_cost,
};

impl Route {
    pub fn new(warehouse: Location, customers: Vec<Location>) -> Self {
        Route {
            warehouse,
            customers,
        }
    }

    /// Total demand of the customers on this route.
    pub fn demand(&self) -> u64 {
        self.customers.iter().map(|c| c.demand).sum()
    }

    /// Travel distance including both warehouse legs.
    pub fn length(&self) -> f64 {
        find_route_length(self)
    }

    /// Travel, waiting and service time including the return to the warehouse.
    pub fn cost(&self) -> f64 {
        find_route_cost(self)
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Arrival time at each customer, in visiting order.
    pub fn arrival_times(&self) -> Vec<f64> {
        let mut arrivals = Vec::with_capacity(self.customers.len());
        let mut current = &self.warehouse;
        let mut cost = 0.0;
        for customer in &self.customers {
            let arrival = cost + distance(current, customer);
            arrivals.push(arrival);
            cost = arrival + (customer.ready_time - arrival).max(0.0) + customer.service;
            current = customer;
        }
        arrivals
    }

    /// Directed edges actually driven: warehouse -> first, consecutive pairs, last -> warehouse.
    pub fn edges(&self) -> Vec<(&Location, &Location)> {
        if self.customers.is_empty() {
            return vec![];
        }

        std::iter::once(&self.warehouse)
            .chain(self.customers.iter())
            .chain(std::iter::once(&self.warehouse))
            .tuple_windows()
            .collect()
    }

    pub fn customer_ids(&self) -> Vec<usize> {
        self.customers.iter().map(|c| c.id).collect()
    }
}

impl Solution {
    /// Wraps routes and computes their total cost.
    pub fn from_routes(routes: Vec<Route>) -> Self {
        let cost = find_solution_cost(&routes);
        Solution { routes, cost }
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn num_customers(&self) -> usize {
        self.routes.iter().map(|r| r.customers.len()).sum()
    }
}

/// Read-only accessor: total cost of a solution.
pub fn cost(solution: &Solution) -> f64 {
    solution.cost()
}

/// Read-only accessor: total demand on a route.
pub fn demand(route: &Route) -> u64 {
    route.demand()
}

/// Read-only accessor: travel distance of a route.
pub fn length(route: &Route) -> f64 {
    route.length()
}

/// Checks coverage, capacity and time windows of `solution` against `instance`.
pub fn validate_solution(
    solution: &Solution,
    instance: &ProblemInstance,
) -> Result<(), SolverError> {
    let mut seen: HashMap<usize, usize> = HashMap::new();

    for (route_ind, route) in solution.routes.iter().enumerate() {
        if route.is_empty() {
            return Err(SolverError::InvalidSolution(format!(
                "route {} has no customers",
                route_ind
            )));
        }

        let load = route.demand();
        if load > instance.vehicle_capacity {
            return Err(SolverError::InvalidSolution(format!(
                "route {} carries {} but capacity is {}",
                route_ind, load, instance.vehicle_capacity
            )));
        }

        for (customer, arrival) in route.customers.iter().zip(route.arrival_times()) {
            if arrival > customer.due_date {
                return Err(SolverError::InvalidSolution(format!(
                    "route {} reaches customer {} at {:.2} after its due date {:.2}",
                    route_ind, customer.id, arrival, customer.due_date
                )));
            }
            *seen.entry(customer.id).or_insert(0) += 1;
        }
    }

    for customer in &instance.customers {
        match seen.remove(&customer.id) {
            Some(1) => {}
            Some(count) => {
                return Err(SolverError::InvalidSolution(format!(
                    "customer {} is visited {} times",
                    customer.id, count
                )))
            }
            None => {
                return Err(SolverError::InvalidSolution(format!(
                    "customer {} is not visited",
                    customer.id
                )))
            }
        }
    }

    if let Some(unknown) = seen.keys().min() {
        return Err(SolverError::InvalidSolution(format!(
            "location {} is not a customer of this instance",
            unknown
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> ProblemInstance {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let customers = vec![
            Location::new(1, 10.0, 0.0, 5, 0.0, 100.0, 0.0),
            Location::new(2, 20.0, 0.0, 5, 0.0, 100.0, 0.0),
        ];
        ProblemInstance::new(warehouse, customers, 10).unwrap()
    }

    fn route_of(instance: &ProblemInstance, ids: &[usize]) -> Route {
        let customers = ids
            .iter()
            .map(|id| *instance.customers.iter().find(|c| c.id == *id).unwrap())
            .collect();
        Route::new(instance.warehouse, customers)
    }

    #[test]
    fn edges_are_bookended_by_warehouse() {
        let pi = instance();
        let route = route_of(&pi, &[1, 2]);
        let edges: Vec<(usize, usize)> = route.edges().iter().map(|(a, b)| (a.id, b.id)).collect();

        assert_eq!(edges, vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn empty_route_has_no_edges() {
        let pi = instance();
        assert!(Route::new(pi.warehouse, vec![]).edges().is_empty());
    }

    #[test]
    fn accessors_report_route_figures() {
        let pi = instance();
        let route = route_of(&pi, &[1, 2]);
        let solution = Solution::from_routes(vec![route.clone()]);

        assert_eq!(demand(&route), 10);
        assert!((length(&route) - 40.0).abs() < 1e-9);
        assert!((cost(&solution) - 40.0).abs() < 1e-9);
        assert_eq!(solution.num_customers(), 2);
    }

    #[test]
    fn arrival_times_account_for_waiting() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let route = Route::new(
            warehouse,
            vec![
                Location::new(1, 10.0, 0.0, 1, 30.0, 100.0, 5.0),
                Location::new(2, 20.0, 0.0, 1, 0.0, 100.0, 0.0),
            ],
        );

        assert_eq!(route.arrival_times(), vec![10.0, 45.0]);
    }

    #[test]
    fn valid_solution_passes() {
        let pi = instance();
        let solution = Solution::from_routes(vec![route_of(&pi, &[2, 1])]);

        assert!(validate_solution(&solution, &pi).is_ok());
    }

    #[test]
    fn missing_customer_is_reported() {
        let pi = instance();
        let solution = Solution::from_routes(vec![route_of(&pi, &[1])]);

        assert!(matches!(
            validate_solution(&solution, &pi),
            Err(SolverError::InvalidSolution(_))
        ));
    }

    #[test]
    fn duplicate_visit_is_reported() {
        let pi = instance();
        let solution =
            Solution::from_routes(vec![route_of(&pi, &[1, 2]), route_of(&pi, &[1])]);

        assert!(validate_solution(&solution, &pi).is_err());
    }

    #[test]
    fn overloaded_route_is_reported() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let customers = vec![
            Location::new(1, 10.0, 0.0, 5, 0.0, 100.0, 0.0),
            Location::new(2, 20.0, 0.0, 5, 0.0, 100.0, 0.0),
        ];
        let pi = ProblemInstance::new(warehouse, customers, 5).unwrap();
        let solution = Solution::from_routes(vec![route_of(&pi, &[1, 2])]);

        assert!(validate_solution(&solution, &pi).is_err());
    }

    #[test]
    fn late_arrival_is_reported() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let customers = vec![
            Location::new(1, 10.0, 0.0, 1, 0.0, 100.0, 0.0),
            Location::new(2, 20.0, 0.0, 1, 0.0, 15.0, 0.0),
        ];
        let pi = ProblemInstance::new(warehouse, customers, 5).unwrap();
        let solution = Solution::from_routes(vec![route_of(&pi, &[1, 2])]);

        assert!(validate_solution(&solution, &pi).is_err());
    }
}
