use tracing::{debug, info};

use crate::domain::error::SolverError;
use crate::domain::types::{Location, ProblemInstance, Route, Solution};
use crate::evaluation::feasibility::deliverable;
use crate::evaluation::fitness::cost_to;

/// Greedy constructor: always drive to the deliverable customer that is done soonest.
///
/// Closes the route and starts a fresh one from the warehouse when nothing fits.
pub fn nearest_neighbor(instance: &ProblemInstance) -> Result<Solution, SolverError> {
    instance.check_feasibility()?;

    let solution = Solution::from_routes(build_routes(instance)?);
    info!(
        "Nearest neighbour: {} routes, cost = {:.2}",
        solution.num_routes(),
        solution.cost
    );
    Ok(solution)
}

fn build_routes(instance: &ProblemInstance) -> Result<Vec<Route>, SolverError> {
    let mut unassigned: Vec<Location> = instance.customers.clone();
    let mut routes = Vec::new();

    while !unassigned.is_empty() {
        let mut current = instance.warehouse;
        let mut cost = 0.0;
        let mut load = 0;
        let mut customers = Vec::new();

        loop {
            let next = deliverable(
                &current,
                &unassigned,
                instance.vehicle_capacity - load,
                cost,
            )
            .into_iter()
            .min_by(|a, b| cost_to(&current, a, cost).total_cmp(&cost_to(&current, b, cost)))
            .copied();

            let Some(next) = next else {
                break;
            };

            cost = cost_to(&current, &next, cost);
            load += next.demand;
            customers.push(next);
            unassigned.retain(|c| c.id != next.id);
            current = next;
        }

        if customers.is_empty() {
            return Err(SolverError::ConstructionStalled {
                iteration: 0,
                ant: 0,
                unassigned: unassigned.iter().map(|c| c.id).collect(),
            });
        }
        debug!(
            "Closed route {:?}, load {}",
            customers.iter().map(|c| c.id).collect::<Vec<_>>(),
            load
        );
        routes.push(Route::new(instance.warehouse, customers));
    }

    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::solution::validate_solution;

    #[test]
    fn follows_the_line_outward() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let customers = vec![
            Location::new(2, 20.0, 0.0, 5, 0.0, 100.0, 0.0),
            Location::new(1, 10.0, 0.0, 5, 0.0, 100.0, 0.0),
        ];
        let pi = ProblemInstance::new(warehouse, customers, 10).unwrap();

        let solution = nearest_neighbor(&pi).unwrap();

        assert_eq!(solution.num_routes(), 1);
        assert_eq!(solution.routes[0].customer_ids(), vec![1, 2]);
        assert!((solution.cost - 40.0).abs() < 1e-9);
    }

    #[test]
    fn waiting_time_makes_a_close_customer_expensive() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let customers = vec![
            // close, but only opens at 50
            Location::new(1, 5.0, 0.0, 1, 50.0, 200.0, 0.0),
            Location::new(2, 0.0, 10.0, 1, 0.0, 200.0, 0.0),
        ];
        let pi = ProblemInstance::new(warehouse, customers, 10).unwrap();

        let solution = nearest_neighbor(&pi).unwrap();

        assert_eq!(solution.routes[0].customer_ids(), vec![2, 1]);
    }

    #[test]
    fn produces_valid_solutions() {
        let warehouse = Location::warehouse(0, 50.0, 50.0, 1000.0);
        let customers = (1..=20)
            .map(|id| {
                Location::new(
                    id,
                    (id * 13 % 100) as f64,
                    (id * 29 % 100) as f64,
                    (id % 5 + 1) as u64,
                    (id * 11 % 60) as f64,
                    300.0,
                    3.0,
                )
            })
            .collect();
        let pi = ProblemInstance::new(warehouse, customers, 12).unwrap();

        let solution = nearest_neighbor(&pi).unwrap();

        validate_solution(&solution, &pi).unwrap();
    }

    #[test]
    fn unreachable_customer_stalls_route_building() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let customers = vec![
            Location::new(1, 10.0, 0.0, 1, 0.0, 100.0, 0.0),
            Location::new(2, 30.0, 40.0, 1, 0.0, 10.0, 0.0),
        ];
        let pi = ProblemInstance::new(warehouse, customers, 10).unwrap();

        assert_eq!(
            build_routes(&pi).unwrap_err(),
            SolverError::ConstructionStalled {
                iteration: 0,
                ant: 0,
                unassigned: vec![2],
            }
        );
    }

    #[test]
    fn infeasible_instance_is_rejected() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let customers = vec![Location::new(1, 50.0, 0.0, 1, 0.0, 10.0, 0.0)];
        let pi = ProblemInstance::new(warehouse, customers, 10).unwrap();

        assert!(matches!(
            nearest_neighbor(&pi),
            Err(SolverError::InstanceInfeasible { customer: 1, .. })
        ));
    }
}
