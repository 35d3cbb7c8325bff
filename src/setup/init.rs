use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info, span, warn, Level};

use crate::config::SolverConfig;
use crate::domain::error::SolverError;
use crate::domain::types::{Location, ProblemInstance, Solution};
use crate::fixtures::data_generator::generate_random_instance;
use crate::setup::init_types::{InstanceFile, LocationRecord};

/// Reads a CSV instance. The first data row is the warehouse, the rest are customers.
pub fn read_instance_csv<R: Read>(
    reader: R,
    vehicle_capacity: u64,
) -> Result<ProblemInstance, SolverError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut locations = Vec::new();
    for row in reader.deserialize::<LocationRecord>() {
        locations.push(Location::from(row?));
    }

    let mut rows = locations.into_iter();
    let warehouse = rows
        .next()
        .ok_or_else(|| SolverError::InvalidConfig("instance file has no rows".to_string()))?;
    let customers: Vec<Location> = rows.collect();
    debug!("Read warehouse {} and {} customers", warehouse.id, customers.len());

    ProblemInstance::new(warehouse, customers, vehicle_capacity)
}

/// Reads a JSON instance. A capacity stored in the file wins over `default_capacity`.
pub fn read_instance_json<R: Read>(
    reader: R,
    default_capacity: u64,
) -> Result<ProblemInstance, SolverError> {
    let file: InstanceFile = serde_json::from_reader(reader)?;
    let capacity = file.vehicle_capacity.unwrap_or(default_capacity);

    ProblemInstance::new(
        file.warehouse.into(),
        file.customers.into_iter().map(Location::from).collect(),
        capacity,
    )
}

/// Loads an instance from disk; `.json` files are JSON, anything else is read as CSV.
pub fn load_instance(path: &str, vehicle_capacity: u64) -> Result<ProblemInstance, SolverError> {
    let file = File::open(path)
        .map_err(|err| SolverError::Io(format!("cannot open instance {}: {}", path, err)))?;

    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let instance = if is_json {
        read_instance_json(file, vehicle_capacity)?
    } else {
        read_instance_csv(file, vehicle_capacity)?
    };
    info!(
        "Loaded {} customers from {} (capacity {})",
        instance.customers.len(),
        path,
        instance.vehicle_capacity
    );
    Ok(instance)
}

/// Obtains the instance (file or generated), checks it can be served at all and
/// builds the optional seed solution.
pub fn setup(config: &SolverConfig) -> Result<(ProblemInstance, Option<Solution>), SolverError> {
    let span = span!(Level::INFO, "setup");
    let _guard = span.enter();

    let instance = match &config.instance_path {
        Some(path) => load_instance(path, config.vehicle_capacity)?,
        None => {
            warn!(
                "No instance file configured, generating {} random customers",
                config.customer_count
            );
            generate_random_instance(
                config.customer_count,
                config.vehicle_capacity,
                config.params.seed,
            )?
        }
    };
    instance.check_feasibility()?;

    let seed_solution = config.seed_heuristic.build(&instance)?;
    if let Some(solution) = &seed_solution {
        info!(
            "Seed heuristic '{}': {} routes, cost = {:.2}",
            config.seed_heuristic,
            solution.num_routes(),
            solution.cost
        );
    }

    info!("Setup completed successfully");
    Ok((instance, seed_solution))
}
