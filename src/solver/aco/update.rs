use tracing::{debug, error};

use crate::domain::error::SolverError;
use crate::domain::types::{Discipline, ProblemInstance, Solution};
use crate::solver::aco::pheromone::{deposit_for, PheromoneMatrix};

/// Applies one iteration's batch to the matrix using the run's discipline.
///
/// The whole batch is checked before any weight changes, so a rejected batch
/// leaves the matrix untouched.
pub fn update_pheromones(
    discipline: Discipline,
    pheromones: &mut PheromoneMatrix,
    solutions: &[Solution],
    instance: &ProblemInstance,
    rho: f64,
    iteration: usize,
) -> Result<(), SolverError> {
    if solutions.is_empty() {
        error!("Empty batch handed to pheromone update in iteration {}", iteration);
        return Err(SolverError::EmptyBatchUpdate {
            iteration,
            solution: 0,
            reason: "batch holds no solutions".to_string(),
        });
    }

    let edges = solutions
        .iter()
        .enumerate()
        .map(|(ind, solution)| traversed_edges(solution, instance, iteration, ind))
        .collect::<Result<Vec<_>, _>>()?;

    match discipline {
        Discipline::EvaporateDeposit => evaporate_and_deposit(pheromones, solutions, &edges, rho),
        Discipline::Elitist => {
            elitist_update(pheromones, solutions, &edges, rho, instance.customers.len())
        }
    }

    debug!(
        "Pheromones after iteration {}: min {:.3e}, max {:.3e}",
        iteration,
        pheromones.min_weight(),
        pheromones.max_weight()
    );
    Ok(())
}

/// Slot pairs of every directed edge a solution drives.
fn traversed_edges(
    solution: &Solution,
    instance: &ProblemInstance,
    iteration: usize,
    ind: usize,
) -> Result<Vec<(usize, usize)>, SolverError> {
    let reject = |reason: String| {
        error!(
            "Invariant violation in iteration {}, solution {}: {}",
            iteration, ind, reason
        );
        SolverError::EmptyBatchUpdate {
            iteration,
            solution: ind,
            reason,
        }
    };

    if !solution.cost.is_finite() || solution.cost < 0.0 {
        return Err(reject(format!(
            "total cost {} cannot be inverted",
            solution.cost
        )));
    }
    if solution.routes.is_empty() {
        return Err(reject("solution has no routes".to_string()));
    }

    let mut edges = Vec::new();
    for (route_ind, route) in solution.routes.iter().enumerate() {
        if route.is_empty() {
            return Err(reject(format!("route {} has no customers", route_ind)));
        }
        for (from, to) in route.edges() {
            match (instance.slot_of(from), instance.slot_of(to)) {
                (Some(a), Some(b)) if a != b => edges.push((a, b)),
                _ => {
                    return Err(reject(format!(
                        "route {} uses edge {} -> {} outside the instance",
                        route_ind, from.id, to.id
                    )))
                }
            }
        }
    }
    Ok(edges)
}

/// Discipline A: evaporate everywhere, then every solution deposits `1 / cost` on its edges.
fn evaporate_and_deposit(
    pheromones: &mut PheromoneMatrix,
    solutions: &[Solution],
    edges: &[Vec<(usize, usize)>],
    rho: f64,
) {
    pheromones.update_all(|w| w * (1.0 - rho));

    for (solution, solution_edges) in solutions.iter().zip(edges) {
        let deposit = deposit_for(solution.cost);
        for &(from, to) in solution_edges {
            pheromones.update_edge(from, to, |w| w + deposit);
        }
    }
}

/// Discipline B: pull every edge toward `initial / n_customers`, then reinforce the iteration best.
fn elitist_update(
    pheromones: &mut PheromoneMatrix,
    solutions: &[Solution],
    edges: &[Vec<(usize, usize)>],
    rho: f64,
    n_customers: usize,
) {
    let baseline = pheromones.initial_weight() / n_customers as f64;
    pheromones.update_all(|w| (1.0 - rho) * w + rho * baseline);

    // batch is non-empty, checked by the caller
    let best = solutions
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cost.total_cmp(&b.cost))
        .map(|(ind, _)| ind)
        .unwrap_or(0);
    let reinforcement = rho * deposit_for(solutions[best].cost);

    for &(from, to) in &edges[best] {
        pheromones.update_edge(from, to, |w| (1.0 - rho) * w + reinforcement);
    }
}
