use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::SolverError;
use crate::domain::types::Discipline;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcoParams {
    /// Influence of pheromone on the next hop.
    pub alpha: f64,
    /// Influence of geometric desirability on the next hop.
    pub beta: f64,
    /// Evaporation rate, strictly between 0 and 1.
    pub rho: f64,
    pub n_ants: usize,
    pub max_iter: usize,
    pub discipline: Discipline,
    /// Master seed. Every ant of every iteration derives its own seed from it.
    pub seed: u64,
}

impl AcoParams {
    pub fn new(
        alpha: f64,
        beta: f64,
        rho: f64,
        n_ants: usize,
        max_iter: usize,
        discipline: Discipline,
        seed: Option<u64>,
    ) -> Self {
        AcoParams {
            alpha,
            beta,
            rho,
            n_ants,
            max_iter,
            discipline,
            seed: seed.unwrap_or_else(|| rand::thread_rng().gen()),
        }
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(SolverError::InvalidConfig(format!(
                "alpha must be a non-negative number, got {}",
                self.alpha
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(SolverError::InvalidConfig(format!(
                "beta must be a non-negative number, got {}",
                self.beta
            )));
        }
        if !(self.rho > 0.0 && self.rho < 1.0) {
            return Err(SolverError::InvalidConfig(format!(
                "rho must lie strictly between 0 and 1, got {}",
                self.rho
            )));
        }
        if self.n_ants == 0 {
            return Err(SolverError::InvalidConfig(
                "at least one ant is required".to_string(),
            ));
        }
        if self.max_iter == 0 {
            return Err(SolverError::InvalidConfig(
                "at least one iteration is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AcoParams {
        AcoParams::new(1.0, 2.0, 0.1, 4, 10, Discipline::EvaporateDeposit, Some(1))
    }

    #[test]
    fn accepts_sane_parameters() {
        assert!(params().validate().is_ok());
        assert!(AcoParams { alpha: 0.0, beta: 0.0, ..params() }.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_rho() {
        for rho in [0.0, 1.0, -0.5, f64::NAN] {
            let p = AcoParams { rho, ..params() };
            assert!(matches!(p.validate(), Err(SolverError::InvalidConfig(_))));
        }
    }

    #[test]
    fn rejects_negative_weights_and_empty_loops() {
        assert!(AcoParams { alpha: -1.0, ..params() }.validate().is_err());
        assert!(AcoParams { beta: f64::INFINITY, ..params() }.validate().is_err());
        assert!(AcoParams { n_ants: 0, ..params() }.validate().is_err());
        assert!(AcoParams { max_iter: 0, ..params() }.validate().is_err());
    }

    #[test]
    fn explicit_seed_is_kept() {
        assert_eq!(params().seed, 1);
    }
}
