pub mod ant;
pub mod params;
pub mod pheromone;
pub mod search;
pub mod update;

pub use ant::{roulette, Ant, AntSolution, Draw};
pub use params::AcoParams;
pub use pheromone::{deposit_for, PheromoneMatrix, MIN_PHEROMONE};
pub use search::{run, SearchOutcome};
pub use update::update_pheromones;
