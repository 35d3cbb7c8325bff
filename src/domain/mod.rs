pub mod error;
pub mod solution;
pub mod types;

pub use error::{Infeasibility, SolverError};
pub use solution::{cost, demand, length, validate_solution};
pub use types::{Discipline, Location, ProblemInstance, Route, SearchState, Solution};
