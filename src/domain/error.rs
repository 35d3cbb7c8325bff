use std::error::Error;
use std::fmt;

/// Why a customer can never be placed on any route.
#[derive(Debug, Clone, PartialEq)]
pub enum Infeasibility {
    DemandExceedsCapacity { demand: u64, capacity: u64 },
    UnreachableDueDate { due_date: f64, earliest_arrival: f64 },
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DemandExceedsCapacity { demand, capacity } => write!(
                f,
                "demand {} exceeds vehicle capacity {}",
                demand, capacity
            ),
            Self::UnreachableDueDate {
                due_date,
                earliest_arrival,
            } => write!(
                f,
                "due date {:.2} is before the earliest possible arrival {:.2}",
                due_date, earliest_arrival
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// A parameter or instance-level setting is out of range.
    InvalidConfig(String),
    /// A single location is malformed.
    InvalidLocation { id: usize, reason: String },
    DuplicateLocation(usize),
    /// A customer can never be served. Raised before the search starts.
    InstanceInfeasible {
        customer: usize,
        reason: Infeasibility,
    },
    /// An ant closed an empty route while customers were still unassigned.
    ConstructionStalled {
        iteration: usize,
        ant: usize,
        unassigned: Vec<usize>,
    },
    /// A batch handed to the pheromone update holds a route or solution with no usable cost.
    EmptyBatchUpdate {
        iteration: usize,
        solution: usize,
        reason: String,
    },
    /// A solution breaks coverage, capacity or time window rules.
    InvalidSolution(String),
    /// Reading an instance or writing results failed.
    Io(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::InvalidLocation { id, reason } => {
                write!(f, "Invalid location {}: {}", id, reason)
            }
            Self::DuplicateLocation(id) => write!(f, "Location id {} appears more than once", id),
            Self::InstanceInfeasible { customer, reason } => {
                write!(f, "Instance infeasible: customer {} {}", customer, reason)
            }
            Self::ConstructionStalled {
                iteration,
                ant,
                unassigned,
            } => write!(
                f,
                "Construction stalled in iteration {} (ant {}): no route can serve customers {:?}",
                iteration, ant, unassigned
            ),
            Self::EmptyBatchUpdate {
                iteration,
                solution,
                reason,
            } => write!(
                f,
                "Pheromone update in iteration {} rejected solution {}: {}",
                iteration, solution, reason
            ),
            Self::InvalidSolution(msg) => write!(f, "Invalid solution: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl Error for SolverError {}

impl From<std::io::Error> for SolverError {
    fn from(err: std::io::Error) -> Self {
        SolverError::Io(err.to_string())
    }
}

impl From<csv::Error> for SolverError {
    fn from(err: csv::Error) -> Self {
        SolverError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SolverError {
    fn from(err: serde_json::Error) -> Self {
        SolverError::Io(err.to_string())
    }
}
