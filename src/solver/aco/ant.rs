use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::domain::error::SolverError;
use crate::domain::types::{ProblemInstance, Route, Solution};
use crate::evaluation::feasibility::is_deliverable;
use crate::evaluation::fitness::{cost_to, distance};
use crate::solver::aco::pheromone::PheromoneMatrix;

/// Keeps the desirability of a zero-length hop finite.
pub const DISTANCE_EPSILON: f64 = 1e-9;

/// Outcome of one roulette draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    Weighted(usize),
    /// Weights summed to zero, NaN or infinity and a uniform draw was used instead.
    Degenerate(usize),
}

/// Picks an index with probability proportional to its weight.
///
/// Falls back to a uniform choice when the weights cannot be normalized. If some
/// weights overflowed to infinity the uniform choice is made among those only.
pub fn roulette<R: Rng>(weights: &[f64], rng: &mut R) -> Draw {
    let total: f64 = weights.iter().sum();
    if total.is_finite() && total > 0.0 {
        if let Ok(dist) = WeightedIndex::<f64>::new(weights) {
            return Draw::Weighted(dist.sample(rng));
        }
    }

    let infinite: Vec<usize> = weights
        .iter()
        .enumerate()
        .filter(|(_, w)| **w == f64::INFINITY)
        .map(|(ind, _)| ind)
        .collect();
    if !infinite.is_empty() {
        return Draw::Degenerate(infinite[rng.gen_range(0..infinite.len())]);
    }
    Draw::Degenerate(rng.gen_range(0..weights.len()))
}

/// One stochastic construction trial.
///
/// Reads a frozen pheromone snapshot and owns its random source, so trials of
/// the same iteration can run on any thread in any order.
#[derive(Clone)]
pub struct Ant<'a> {
    instance: &'a ProblemInstance,
    pheromone_matrix: &'a PheromoneMatrix,
    alpha: f64,
    beta: f64,
    rng_seed: u64,
    id: usize,
    iteration: usize,
}

pub struct AntSolution {
    pub solution: Solution,
    /// Roulette draws that fell back to a uniform choice.
    pub degenerate_draws: usize,
    /// Candidate weights computed while building the solution.
    pub evaluations: usize,
}

impl<'a> Ant<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instance: &'a ProblemInstance,
        pheromone_matrix: &'a PheromoneMatrix,
        alpha: f64,
        beta: f64,
        rng_seed: u64,
        id: usize,
        iteration: usize,
    ) -> Self {
        Ant {
            instance,
            pheromone_matrix,
            alpha,
            beta,
            rng_seed,
            id,
            iteration,
        }
    }

    fn weight(&self, from: usize, to: usize) -> f64 {
        let pheromone = self.pheromone_matrix.get(from, to);
        let hop = distance(self.instance.location(from), self.instance.location(to));
        let desirability = 1.0 / (hop + DISTANCE_EPSILON);
        pheromone.powf(self.alpha) * desirability.powf(self.beta)
    }

    /// Builds routes until every customer is assigned.
    pub fn get_solution(&self) -> Result<AntSolution, SolverError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.rng_seed);
        let capacity = self.instance.vehicle_capacity;
        let mut unassigned: Vec<usize> = (1..self.instance.size()).collect();
        let mut routes = Vec::new();
        let mut degenerate_draws = 0;
        let mut evaluations = 0;

        while !unassigned.is_empty() {
            let mut current = 0;
            let mut cost = 0.0;
            let mut load = 0;
            let mut customers = Vec::new();

            loop {
                let current_loc = self.instance.location(current);
                let mut candidates: Vec<usize> = unassigned
                    .iter()
                    .copied()
                    .filter(|&slot| {
                        let candidate = self.instance.location(slot);
                        is_deliverable(current_loc, candidate, capacity - load, cost)
                    })
                    .collect();

                if candidates.is_empty() {
                    break;
                }

                candidates.sort_by(|&a, &b| {
                    let (la, lb) = (self.instance.location(a), self.instance.location(b));
                    la.due_date
                        .total_cmp(&lb.due_date)
                        .then_with(|| lb.demand.cmp(&la.demand))
                });

                let weights: Vec<f64> = candidates
                    .iter()
                    .map(|&slot| self.weight(current, slot))
                    .collect();
                evaluations += weights.len();

                let next = match roulette(&weights, &mut rng) {
                    Draw::Weighted(ind) => candidates[ind],
                    Draw::Degenerate(ind) => {
                        degenerate_draws += 1;
                        debug!(
                            ant = self.id,
                            iteration = self.iteration,
                            "Degenerate weights over {} candidates, drawing uniformly",
                            candidates.len()
                        );
                        candidates[ind]
                    }
                };

                let next_loc = self.instance.location(next);
                trace!(ant = self.id, "{} -> {}", current_loc.id, next_loc.id);
                customers.push(*next_loc);
                load += next_loc.demand;
                cost = cost_to(current_loc, next_loc, cost);
                unassigned.retain(|&slot| slot != next);
                current = next;
            }

            if customers.is_empty() {
                return Err(SolverError::ConstructionStalled {
                    iteration: self.iteration,
                    ant: self.id,
                    unassigned: unassigned
                        .iter()
                        .map(|&slot| self.instance.location(slot).id)
                        .collect(),
                });
            }
            routes.push(Route::new(self.instance.warehouse, customers));
        }

        Ok(AntSolution {
            solution: Solution::from_routes(routes),
            degenerate_draws,
            evaluations,
        })
    }
}
