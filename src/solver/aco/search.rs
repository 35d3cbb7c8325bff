use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, span, warn, Level};

use crate::domain::error::SolverError;
use crate::domain::types::{ProblemInstance, SearchState, Solution};
use crate::solver::aco::ant::{Ant, AntSolution};
use crate::solver::aco::params::AcoParams;
use crate::solver::aco::pheromone::PheromoneMatrix;
use crate::solver::aco::update::update_pheromones;

/// What a finished run hands back.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_solution: Solution,
    /// Global best cost after each iteration. Never increases.
    pub cost_history: Vec<f64>,
    /// (iteration, cost) every time the global best improved.
    pub best_so_far_updates: Vec<(usize, f64)>,
    pub best_so_far_iteration: usize,
    pub degenerate_draws: usize,
}

/// Builds the initial matrix: uniform, or `1 / cost` of a known solution.
fn init_pheromones(
    instance: &ProblemInstance,
    seed_solution: Option<&Solution>,
) -> Result<PheromoneMatrix, SolverError> {
    match seed_solution {
        Some(seed) => {
            info!(
                "Seeding pheromones from a solution with {} routes, cost = {:.2}",
                seed.routes.len(),
                seed.cost
            );
            PheromoneMatrix::seeded(instance.size(), seed.cost)
        }
        None => Ok(PheromoneMatrix::uniform(instance.size())),
    }
}

/// Runs every ant of one iteration against the same frozen matrix.
fn construct_batch(
    iteration: usize,
    state: &mut SearchState,
    params: &AcoParams,
    instance: &ProblemInstance,
    pheromones: &PheromoneMatrix,
) -> Result<Vec<AntSolution>, SolverError> {
    // drawn up front so the outcome does not depend on thread scheduling
    let seeds: Vec<u64> = (0..params.n_ants).map(|_| state.rng.gen()).collect();

    seeds
        .into_par_iter()
        .enumerate()
        .map(|(ant_id, seed)| {
            Ant::new(
                instance,
                pheromones,
                params.alpha,
                params.beta,
                seed,
                ant_id + 1,
                iteration,
            )
            .get_solution()
        })
        .collect()
}

/// One generation: parallel construction, barrier, single update, best tracking.
fn perform_iteration(
    iteration: usize,
    state: &mut SearchState,
    params: &AcoParams,
    instance: &ProblemInstance,
    pheromones: &mut PheromoneMatrix,
) -> Result<(), SolverError> {
    let iter_span = span!(Level::DEBUG, "iteration", iter = iteration);
    let _iter_guard = iter_span.enter();

    let batch = {
        let span = span!(Level::DEBUG, "construct", ants = params.n_ants);
        let _g = span.enter();
        construct_batch(iteration, state, params, instance, pheromones)?
    };

    let degenerate: usize = batch.iter().map(|ant| ant.degenerate_draws).sum();
    let evaluations: usize = batch.iter().map(|ant| ant.evaluations).sum();
    if degenerate > 0 {
        warn!(
            "Iteration {}: {} roulette draws fell back to uniform selection",
            iteration, degenerate
        );
    }
    state.degenerate_draws += degenerate;

    let solutions: Vec<Solution> = batch.into_iter().map(|ant| ant.solution).collect();

    {
        let span = span!(Level::DEBUG, "update", discipline = %params.discipline);
        let _g = span.enter();
        update_pheromones(
            params.discipline,
            pheromones,
            &solutions,
            instance,
            params.rho,
            iteration,
        )?;
    }

    let iteration_best = solutions
        .into_iter()
        .min_by(|a, b| a.cost.total_cmp(&b.cost));

    if let Some(candidate) = iteration_best {
        debug!(
            "Iteration {} best: cost = {:.2}, routes = {}, evaluations = {}",
            iteration,
            candidate.cost,
            candidate.num_routes(),
            evaluations
        );

        if candidate.cost < state.best_cost() {
            state.best_so_far_iteration = iteration;
            state.best_so_far_updates.push((iteration, candidate.cost));
            info!(
                "New best at iteration {}: cost = {:.2}",
                iteration, candidate.cost
            );
            state.best_so_far = Some(candidate);
        }
    }

    state.cost_history.push(state.best_cost());
    Ok(())
}

/// Runs the colony for `params.max_iter` iterations.
///
/// An optional `seed_solution` only sets the initial pheromone level; it does not
/// count as a candidate for the best solution or enter the cost history.
pub fn run(
    params: &AcoParams,
    instance: &ProblemInstance,
    seed_solution: Option<&Solution>,
) -> Result<SearchOutcome, SolverError> {
    params.validate()?;
    instance.check_feasibility()?;

    info!(
        "Starting {} colony: {} customers, capacity {}, {} ants x {} iterations",
        params.discipline,
        instance.customers.len(),
        instance.vehicle_capacity,
        params.n_ants,
        params.max_iter
    );
    info!(
        "alpha = {}, beta = {}, rho = {}, seed = {}",
        params.alpha, params.beta, params.rho, params.seed
    );

    let mut pheromones = {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();
        init_pheromones(instance, seed_solution)?
    };
    let mut state = SearchState::new(params.seed);

    let loop_span = span!(
        Level::INFO,
        "main_search_loop",
        total_iterations = params.max_iter
    );
    let _loop_guard = loop_span.enter();

    for iteration in 1..=params.max_iter {
        perform_iteration(iteration, &mut state, params, instance, &mut pheromones)?;
    }

    let best_solution = state.best_so_far.take().ok_or_else(|| {
        SolverError::InvalidSolution("search finished without any solution".to_string())
    })?;

    info!(
        "Optimization complete. Best cost {:.2} with {} routes, found at iteration {}",
        best_solution.cost,
        best_solution.num_routes(),
        state.best_so_far_iteration
    );
    if state.degenerate_draws > 0 {
        info!("Degenerate roulette draws: {}", state.degenerate_draws);
    }

    Ok(SearchOutcome {
        best_solution,
        cost_history: state.cost_history,
        best_so_far_updates: state.best_so_far_updates,
        best_so_far_iteration: state.best_so_far_iteration,
        degenerate_draws: state.degenerate_draws,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::solution::validate_solution;
    use crate::domain::types::{Discipline, Location};

    fn instance() -> ProblemInstance {
        let warehouse = Location::warehouse(0, 40.0, 50.0, 1236.0);
        let customers = (1..=15)
            .map(|id| {
                let x = (id * 37 % 80) as f64;
                let y = (id * 53 % 90) as f64;
                Location::new(id, x, y, (id % 3 + 1) as u64, 0.0, 600.0, 5.0)
            })
            .collect();
        ProblemInstance::new(warehouse, customers, 8).unwrap()
    }

    fn params(discipline: Discipline) -> AcoParams {
        AcoParams::new(1.0, 2.0, 0.1, 6, 15, discipline, Some(17))
    }

    #[test]
    fn history_has_one_entry_per_iteration_and_never_rises() {
        let pi = instance();
        let outcome = run(&params(Discipline::EvaporateDeposit), &pi, None).unwrap();

        assert_eq!(outcome.cost_history.len(), 15);
        assert!(outcome
            .cost_history
            .windows(2)
            .all(|pair| pair[1] <= pair[0]));
        assert_eq!(
            *outcome.cost_history.last().unwrap(),
            outcome.best_solution.cost
        );
    }

    #[test]
    fn best_solution_is_valid_under_both_disciplines() {
        let pi = instance();
        for discipline in [Discipline::EvaporateDeposit, Discipline::Elitist] {
            let outcome = run(&params(discipline), &pi, None).unwrap();
            validate_solution(&outcome.best_solution, &pi).unwrap();
        }
    }

    #[test]
    fn fixed_seed_reproduces_the_run() {
        let pi = instance();
        let first = run(&params(Discipline::Elitist), &pi, None).unwrap();
        let second = run(&params(Discipline::Elitist), &pi, None).unwrap();

        assert_eq!(first.best_solution, second.best_solution);
        assert_eq!(first.cost_history, second.cost_history);
    }

    #[test]
    fn first_iteration_always_records_a_best() {
        let pi = instance();
        let outcome = run(&params(Discipline::EvaporateDeposit), &pi, None).unwrap();

        assert_eq!(outcome.best_so_far_updates[0].0, 1);
    }

    #[test]
    fn invalid_params_fail_before_the_loop() {
        let pi = instance();
        let bad = AcoParams {
            rho: 1.5,
            ..params(Discipline::EvaporateDeposit)
        };

        assert!(matches!(
            run(&bad, &pi, None),
            Err(SolverError::InvalidConfig(_))
        ));
    }

    #[test]
    fn seed_solution_does_not_enter_history() {
        let pi = instance();
        let seed = Solution::from_routes(
            pi.customers
                .iter()
                .map(|c| crate::domain::types::Route::new(pi.warehouse, vec![*c]))
                .collect(),
        );
        let outcome = run(&params(Discipline::Elitist), &pi, Some(&seed)).unwrap();

        assert_eq!(outcome.cost_history.len(), 15);
        assert_eq!(outcome.best_so_far_updates[0].0, 1);
    }
}
