use std::env;
use std::str::FromStr;

use dotenv::dotenv;
use tracing::debug;

use crate::domain::error::SolverError;
use crate::domain::types::Discipline;
use crate::solver::aco::params::AcoParams;
use crate::solver::constructive::SeedHeuristic;

pub mod constant {
    pub(crate) const ALPHA: f64 = 1.0;
    pub(crate) const BETA: f64 = 2.0;
    pub(crate) const RHO: f64 = 0.1;
    pub(crate) const N_ANTS: usize = 20;
    pub(crate) const MAX_ITER: usize = 200;
    pub(crate) const SEED: u64 = 64;
    pub(crate) const DISCIPLINE: &str = "aco";
    pub(crate) const SEED_HEURISTIC: &str = "none";
    pub(crate) const CUSTOMER_COUNT: usize = 50;
    pub(crate) const VEHICLE_CAPACITY: u64 = 200;
    pub(crate) const COST_HISTORY_CSV_PATH: &str = "cost_history.csv";
}

/// Everything the binary needs to set up a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub params: AcoParams,
    pub seed_heuristic: SeedHeuristic,
    /// CSV or JSON instance file. A random instance is generated when absent.
    pub instance_path: Option<String>,
    pub customer_count: usize,
    pub vehicle_capacity: u64,
    pub history_path: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            params: AcoParams::new(
                constant::ALPHA,
                constant::BETA,
                constant::RHO,
                constant::N_ANTS,
                constant::MAX_ITER,
                Discipline::EvaporateDeposit,
                Some(constant::SEED),
            ),
            seed_heuristic: SeedHeuristic::None,
            instance_path: None,
            customer_count: constant::CUSTOMER_COUNT,
            vehicle_capacity: constant::VEHICLE_CAPACITY,
            history_path: constant::COST_HISTORY_CSV_PATH.to_string(),
        }
    }
}

impl SolverConfig {
    /// Loads `.env` if present, then overrides defaults from `VRPTW_*` variables.
    pub fn from_env() -> Result<Self, SolverError> {
        dotenv().ok();
        SolverConfig::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SolverError> {
        let params = AcoParams::new(
            parse_or(&lookup, "VRPTW_ALPHA", constant::ALPHA)?,
            parse_or(&lookup, "VRPTW_BETA", constant::BETA)?,
            parse_or(&lookup, "VRPTW_RHO", constant::RHO)?,
            parse_or(&lookup, "VRPTW_ANTS", constant::N_ANTS)?,
            parse_or(&lookup, "VRPTW_ITERATIONS", constant::MAX_ITER)?,
            lookup("VRPTW_DISCIPLINE")
                .as_deref()
                .unwrap_or(constant::DISCIPLINE)
                .parse()?,
            Some(parse_or(&lookup, "VRPTW_SEED", constant::SEED)?),
        );
        params.validate()?;

        let config = SolverConfig {
            params,
            seed_heuristic: lookup("VRPTW_SEED_HEURISTIC")
                .as_deref()
                .unwrap_or(constant::SEED_HEURISTIC)
                .parse()?,
            instance_path: lookup("VRPTW_INSTANCE").filter(|path| !path.trim().is_empty()),
            customer_count: parse_or(&lookup, "VRPTW_CUSTOMERS", constant::CUSTOMER_COUNT)?,
            vehicle_capacity: parse_or(&lookup, "VRPTW_CAPACITY", constant::VEHICLE_CAPACITY)?,
            history_path: lookup("VRPTW_HISTORY_CSV")
                .unwrap_or_else(|| constant::COST_HISTORY_CSV_PATH.to_string()),
        };
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, SolverError> {
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            SolverError::InvalidConfig(format!("{} has an invalid value '{}'", key, raw))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<SolverConfig, SolverError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SolverConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = from_pairs(&[]).unwrap();

        assert_eq!(config, SolverConfig::default());
        assert_eq!(config.params.seed, constant::SEED);
    }

    #[test]
    fn variables_override_defaults() {
        let config = from_pairs(&[
            ("VRPTW_ANTS", "8"),
            ("VRPTW_RHO", "0.25"),
            ("VRPTW_DISCIPLINE", "acs"),
            ("VRPTW_SEED_HEURISTIC", "savings"),
            ("VRPTW_INSTANCE", "data/c101.csv"),
        ])
        .unwrap();

        assert_eq!(config.params.n_ants, 8);
        assert_eq!(config.params.rho, 0.25);
        assert_eq!(config.params.discipline, Discipline::Elitist);
        assert_eq!(config.seed_heuristic, SeedHeuristic::Savings);
        assert_eq!(config.instance_path.as_deref(), Some("data/c101.csv"));
    }

    #[test]
    fn unparsable_value_is_a_config_error() {
        let result = from_pairs(&[("VRPTW_ITERATIONS", "many")]);

        assert!(matches!(result, Err(SolverError::InvalidConfig(_))));
    }

    #[test]
    fn out_of_range_parameter_is_rejected() {
        assert!(from_pairs(&[("VRPTW_RHO", "1.0")]).is_err());
    }
}
