use crate::domain::error::{Infeasibility, SolverError};
use crate::domain::types::{Location, ProblemInstance};
use crate::evaluation::fitness::distance;

/// A truck leaving `current` at `cost_so_far` arrives at `candidate` no later than its due date.
/// Waiting is allowed, lateness is not.
pub fn is_reachable(current: &Location, candidate: &Location, cost_so_far: f64) -> bool {
    candidate.due_date >= distance(current, candidate) + cost_so_far
}

/// Reachable and small enough for the remaining capacity.
pub fn is_deliverable(
    current: &Location,
    candidate: &Location,
    capacity: u64,
    cost_so_far: f64,
) -> bool {
    candidate.demand <= capacity && is_reachable(current, candidate, cost_so_far)
}

/// Candidates whose due date can still be met. Empty means the route cannot be extended.
pub fn reachable<'a>(
    current: &Location,
    candidates: &'a [Location],
    cost_so_far: f64,
) -> Vec<&'a Location> {
    candidates
        .iter()
        .filter(|c| is_reachable(current, c, cost_so_far))
        .collect()
}

/// Candidates that are reachable in time and fit into `capacity`.
pub fn deliverable<'a>(
    current: &Location,
    candidates: &'a [Location],
    capacity: u64,
    cost_so_far: f64,
) -> Vec<&'a Location> {
    reachable(current, candidates, cost_so_far)
        .into_iter()
        .filter(|c| c.demand <= capacity)
        .collect()
}

/// Every customer must be servable by a fresh route straight from the warehouse.
///
/// A fresh route starts with full capacity at time zero, so a customer failing
/// this check can never be placed by any ordering.
pub fn check_instance_feasibility(instance: &ProblemInstance) -> Result<(), SolverError> {
    for customer in &instance.customers {
        if customer.demand > instance.vehicle_capacity {
            return Err(SolverError::InstanceInfeasible {
                customer: customer.id,
                reason: Infeasibility::DemandExceedsCapacity {
                    demand: customer.demand,
                    capacity: instance.vehicle_capacity,
                },
            });
        }
        if !is_reachable(&instance.warehouse, customer, 0.0) {
            return Err(SolverError::InstanceInfeasible {
                customer: customer.id,
                reason: Infeasibility::UnreachableDueDate {
                    due_date: customer.due_date,
                    earliest_arrival: distance(&instance.warehouse, customer),
                },
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Location> {
        vec![
            Location::new(1, 10.0, 0.0, 5, 0.0, 10.0, 0.0),
            Location::new(2, 20.0, 0.0, 2, 0.0, 15.0, 0.0),
            Location::new(3, 0.0, 5.0, 9, 0.0, 100.0, 0.0),
        ]
    }

    fn ids(locations: &[&Location]) -> Vec<usize> {
        locations.iter().map(|l| l.id).collect()
    }

    #[test]
    fn arriving_exactly_on_due_date_is_reachable() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let list = candidates();

        assert_eq!(ids(&reachable(&warehouse, &list, 0.0)), vec![1, 3]);
    }

    #[test]
    fn accumulated_cost_shrinks_reachable_set() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let list = candidates();

        assert_eq!(ids(&reachable(&warehouse, &list, 0.5)), vec![3]);
        assert!(reachable(&warehouse, &list, 96.0).is_empty());
    }

    #[test]
    fn deliverable_respects_capacity() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let list = candidates();

        assert_eq!(ids(&deliverable(&warehouse, &list, 5, 0.0)), vec![1]);
        assert_eq!(ids(&deliverable(&warehouse, &list, 9, 0.0)), vec![1, 3]);
        assert!(deliverable(&warehouse, &list, 1, 0.0).is_empty());
    }

    #[test]
    fn demand_above_capacity_is_infeasible() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let customers = vec![Location::new(4, 1.0, 0.0, 11, 0.0, 100.0, 0.0)];
        let pi = ProblemInstance::new(warehouse, customers, 10).unwrap();

        assert_eq!(
            check_instance_feasibility(&pi),
            Err(SolverError::InstanceInfeasible {
                customer: 4,
                reason: Infeasibility::DemandExceedsCapacity {
                    demand: 11,
                    capacity: 10
                },
            })
        );
    }

    #[test]
    fn due_date_closer_than_distance_is_infeasible() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 1000.0);
        let customers = vec![
            Location::new(1, 3.0, 4.0, 1, 0.0, 100.0, 0.0),
            Location::new(2, 30.0, 40.0, 1, 0.0, 49.0, 0.0),
        ];
        let pi = ProblemInstance::new(warehouse, customers, 10).unwrap();

        assert!(matches!(
            check_instance_feasibility(&pi),
            Err(SolverError::InstanceInfeasible {
                customer: 2,
                reason: Infeasibility::UnreachableDueDate { .. },
            })
        ));
    }

    #[test]
    fn predicates_agree_with_collections() {
        let current = Location::new(9, 5.0, 5.0, 1, 0.0, 100.0, 0.0);
        let list = candidates();

        for c in &list {
            let in_set = deliverable(&current, &list, 5, 3.0)
                .iter()
                .any(|d| d.id == c.id);
            assert_eq!(is_deliverable(&current, c, 5, 3.0), in_set);
        }
    }
}
