pub mod nearest_neighbor;
pub mod savings;

use std::fmt;
use std::str::FromStr;

use crate::domain::error::SolverError;
use crate::domain::types::{ProblemInstance, Solution};

pub use nearest_neighbor::nearest_neighbor;
pub use savings::savings;

/// Which greedy constructor, if any, provides the initial pheromone level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedHeuristic {
    None,
    NearestNeighbor,
    Savings,
}

impl SeedHeuristic {
    pub fn build(&self, instance: &ProblemInstance) -> Result<Option<Solution>, SolverError> {
        match self {
            SeedHeuristic::None => Ok(None),
            SeedHeuristic::NearestNeighbor => nearest_neighbor(instance).map(Some),
            SeedHeuristic::Savings => savings(instance).map(Some),
        }
    }
}

impl fmt::Display for SeedHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedHeuristic::None => write!(f, "none"),
            SeedHeuristic::NearestNeighbor => write!(f, "nearest"),
            SeedHeuristic::Savings => write!(f, "savings"),
        }
    }
}

impl FromStr for SeedHeuristic {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(SeedHeuristic::None),
            "nearest" | "nearest-neighbor" | "nn" => Ok(SeedHeuristic::NearestNeighbor),
            "savings" | "clarke-wright" => Ok(SeedHeuristic::Savings),
            other => Err(SolverError::InvalidConfig(format!(
                "unknown seed heuristic '{}' (expected 'none', 'nearest' or 'savings')",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_heuristic_names() {
        assert_eq!("".parse::<SeedHeuristic>().unwrap(), SeedHeuristic::None);
        assert_eq!("NN".parse::<SeedHeuristic>().unwrap(), SeedHeuristic::NearestNeighbor);
        assert_eq!("savings".parse::<SeedHeuristic>().unwrap(), SeedHeuristic::Savings);
        assert!("random".parse::<SeedHeuristic>().is_err());
    }
}
