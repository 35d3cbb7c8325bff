use tracing::{debug, info};

use crate::domain::error::SolverError;
use crate::domain::types::{Location, ProblemInstance, Route, Solution};
use crate::evaluation::fitness::distance;

/// Clarke-Wright savings with capacity and time-window checks on every merge.
///
/// Starts with one route per customer. For the tail `i` of one route and the head
/// `j` of another the saving is `d(w,i) + d(w,j) - d(i,j)`; pairs are merged in
/// descending order of saving whenever the joined route stays feasible.
pub fn savings(instance: &ProblemInstance) -> Result<Solution, SolverError> {
    instance.check_feasibility()?;

    let warehouse = &instance.warehouse;
    let n = instance.customers.len();

    // route id per customer index, route ids start as customer indices
    let mut routes: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();
    let mut owner: Vec<usize> = (0..n).collect();
    let mut loads: Vec<u64> = instance.customers.iter().map(|c| c.demand).collect();

    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1));
    for (i, a) in instance.customers.iter().enumerate() {
        for (j, b) in instance.customers.iter().enumerate() {
            if i == j {
                continue;
            }
            let saving = distance(warehouse, a) + distance(warehouse, b) - distance(a, b);
            if saving > 0.0 {
                pairs.push((saving, i, j));
            }
        }
    }
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| (a.1, a.2).cmp(&(b.1, b.2))));

    let mut merges = 0;
    for (saving, i, j) in pairs {
        let (left, right) = (owner[i], owner[j]);
        if left == right {
            continue;
        }

        let (Some(left_route), Some(right_route)) = (&routes[left], &routes[right]) else {
            continue;
        };
        // i must end its route and j must start its route
        if left_route.last() != Some(&i) || right_route.first() != Some(&j) {
            continue;
        }
        if loads[left] + loads[right] > instance.vehicle_capacity {
            continue;
        }

        let merged: Vec<usize> = left_route.iter().chain(right_route.iter()).copied().collect();
        let customers: Vec<Location> = merged.iter().map(|&ind| instance.customers[ind]).collect();
        if !meets_time_windows(warehouse, &customers) {
            continue;
        }

        debug!(
            "Merging at saving {:.2}: {} -> {}",
            saving, instance.customers[i].id, instance.customers[j].id
        );
        for &ind in &merged {
            owner[ind] = left;
        }
        loads[left] += loads[right];
        routes[left] = Some(merged);
        routes[right] = None;
        merges += 1;
    }

    let routes: Vec<Route> = routes
        .into_iter()
        .flatten()
        .map(|inds| {
            Route::new(
                *warehouse,
                inds.into_iter().map(|ind| instance.customers[ind]).collect(),
            )
        })
        .collect();

    let solution = Solution::from_routes(routes);
    info!(
        "Savings: {} merges, {} routes, cost = {:.2}",
        merges,
        solution.num_routes(),
        solution.cost
    );
    Ok(solution)
}

fn meets_time_windows(warehouse: &Location, customers: &[Location]) -> bool {
    Route::new(*warehouse, customers.to_vec())
        .arrival_times()
        .iter()
        .zip(customers)
        .all(|(arrival, customer)| *arrival <= customer.due_date)
}
