use std::collections::HashSet;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::domain::error::SolverError;
use crate::domain::types::Solution;
use crate::solver::aco::search::SearchOutcome;

/// Logs every route of a solution with its load, length and cost.
pub fn print_solution(solution: &Solution) {
    info!(
        "Solution: {} routes, {} customers, cost = {:.2}",
        solution.num_routes(),
        solution.num_customers(),
        solution.cost
    );
    for (ind, route) in solution.routes.iter().enumerate() {
        info!(
            "Route {}: {:?} | demand = {}, length = {:.2}, cost = {:.2}",
            ind + 1,
            route.customer_ids(),
            route.demand(),
            route.length(),
            route.cost()
        );
    }
}

/// Writes one row per iteration: the global best cost and whether it improved there.
pub fn save_history_csv(
    outcome: &SearchOutcome,
    path: impl AsRef<Path>,
) -> Result<(), SolverError> {
    let improved: HashSet<usize> = outcome
        .best_so_far_updates
        .iter()
        .map(|(iteration, _)| *iteration)
        .collect();

    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(["iteration", "best_cost", "improved"])?;

    for (ind, cost) in outcome.cost_history.iter().enumerate() {
        let iteration = ind + 1;
        wtr.write_record([
            iteration.to_string(),
            cost.to_string(),
            improved.contains(&iteration).to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Location, Route};

    #[test]
    fn history_csv_marks_improving_iterations() {
        let warehouse = Location::warehouse(0, 0.0, 0.0, 100.0);
        let customer = Location::new(1, 3.0, 4.0, 1, 0.0, 50.0, 0.0);
        let outcome = SearchOutcome {
            best_solution: Solution::from_routes(vec![Route::new(warehouse, vec![customer])]),
            cost_history: vec![12.0, 10.0, 10.0],
            best_so_far_updates: vec![(1, 12.0), (2, 10.0)],
            best_so_far_iteration: 2,
            degenerate_draws: 0,
        };
        let path = std::env::temp_dir().join(format!("vrptw_history_{}.csv", std::process::id()));

        save_history_csv(&outcome, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            written,
            "iteration,best_cost,improved\n1,12,true\n2,10,true\n3,10,false\n"
        );
    }
}
