use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::domain::error::SolverError;
use crate::domain::types::{Location, ProblemInstance};
use crate::evaluation::fitness::distance;

/// Side length of the square customers are scattered over.
const GRID_SIZE: f64 = 100.0;
/// Latest time any window may close.
const HORIZON: f64 = 1000.0;
const MIN_WINDOW: f64 = 60.0;
const MAX_WINDOW: f64 = 300.0;

/// Generates a random but always feasible instance: warehouse in the middle of
/// the grid, every customer reachable straight from it and small enough for one truck.
pub fn generate_random_instance(
    customer_count: usize,
    vehicle_capacity: u64,
    seed: u64,
) -> Result<ProblemInstance, SolverError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let warehouse = Location::warehouse(0, GRID_SIZE / 2.0, GRID_SIZE / 2.0, HORIZON);
    let max_demand = (vehicle_capacity / 4).max(1);

    let customers: Vec<Location> = (1..=customer_count)
        .map(|id| {
            let x = rng.gen_range(0.0..GRID_SIZE);
            let y = rng.gen_range(0.0..GRID_SIZE);
            let demand = rng.gen_range(1..=max_demand);
            let service = rng.gen_range(0.0..10.0_f64).round();

            let ready_time = rng.gen_range(0.0..HORIZON / 2.0_f64).round();
            let width = rng.gen_range(MIN_WINDOW..MAX_WINDOW);

            let mut customer = Location::new(id, x, y, demand, ready_time, 0.0, service);
            // never due before a truck driving straight from the warehouse can arrive
            customer.due_date = (ready_time + width).max(distance(&warehouse, &customer).ceil());
            customer
        })
        .collect();

    let total_demand: u64 = customers.iter().map(|c| c.demand).sum();
    info!(
        "Generated {} customers (seed {}), total demand {}, capacity {}",
        customer_count, seed, total_demand, vehicle_capacity
    );
    debug!("Customers: {:?}", customers);

    ProblemInstance::new(warehouse, customers, vehicle_capacity)
}
