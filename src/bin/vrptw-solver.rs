use std::error::Error;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vrptw::config::SolverConfig;
use vrptw::setup::setup;
use vrptw::solver::aco::search;
use vrptw::utils::{print_solution, save_history_csv};

/// Initialize tracing and environment
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    // .env is loaded first so RUST_LOG from it reaches the filter
    let config = SolverConfig::from_env()?;
    init_tracing();

    info!(
        "Starting VRPTW solver: {} discipline, {} ants, {} iterations, seed heuristic '{}'",
        config.params.discipline,
        config.params.n_ants,
        config.params.max_iter,
        config.seed_heuristic
    );

    let (instance, seed_solution) = setup(&config)?;
    if let Some(seed) = &seed_solution {
        print_solution(seed);
    }

    let outcome = search::run(&config.params, &instance, seed_solution.as_ref())?;

    info!("BEST SOLUTION:");
    print_solution(&outcome.best_solution);

    save_history_csv(&outcome, &config.history_path)?;
    info!("Cost history written to {}", config.history_path);

    Ok(())
}
