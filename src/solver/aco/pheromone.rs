use crate::domain::error::SolverError;
use crate::solver::aco::ant::DISTANCE_EPSILON;

/// Smallest weight an edge may hold. Keeps long runs from underflowing to zero.
pub const MIN_PHEROMONE: f64 = f64::MIN_POSITIVE;

/// Pheromone laid for a solution of the given total cost.
///
/// Co-located customers can make a whole tour free; such costs count as
/// [`DISTANCE_EPSILON`] so the deposit stays finite.
pub fn deposit_for(cost: f64) -> f64 {
    1.0 / cost.max(DISTANCE_EPSILON)
}

/// Dense directed pheromone graph over matrix slots (warehouse = 0).
///
/// Row-major `size * size` storage. The diagonal is never read or written:
/// there is no edge from a location to itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    size: usize,
    weights: Vec<f64>,
    initial_weight: f64,
}

impl PheromoneMatrix {
    pub fn new(size: usize, initial_weight: f64) -> Self {
        let mut weights = vec![initial_weight; size * size];
        for i in 0..size {
            weights[i * size + i] = 0.0;
        }

        PheromoneMatrix {
            size,
            weights,
            initial_weight,
        }
    }

    /// Every edge starts at 1.
    pub fn uniform(size: usize) -> Self {
        PheromoneMatrix::new(size, 1.0)
    }

    /// Every edge starts at `1 / seed_cost`, the cost of a previously known solution.
    pub fn seeded(size: usize, seed_cost: f64) -> Result<Self, SolverError> {
        if !seed_cost.is_finite() || seed_cost < 0.0 {
            return Err(SolverError::InvalidConfig(format!(
                "seed solution cost must be finite and not negative, got {}",
                seed_cost
            )));
        }
        Ok(PheromoneMatrix::new(size, deposit_for(seed_cost)))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Weight every edge was initialized with.
    pub fn initial_weight(&self) -> f64 {
        self.initial_weight
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        debug_assert_ne!(from, to, "pheromone matrix has no self loops");
        self.weights[from * self.size + to]
    }

    /// Rewrites one edge with `f(old)`, floored at [`MIN_PHEROMONE`].
    pub fn update_edge(&mut self, from: usize, to: usize, f: impl Fn(f64) -> f64) -> f64 {
        debug_assert_ne!(from, to, "pheromone matrix has no self loops");
        let weight = &mut self.weights[from * self.size + to];
        *weight = f(*weight).max(MIN_PHEROMONE);
        *weight
    }

    /// Rewrites every edge with `f(old)`, floored at [`MIN_PHEROMONE`].
    pub fn update_all(&mut self, f: impl Fn(f64) -> f64) {
        let size = self.size;
        for (ind, weight) in self.weights.iter_mut().enumerate() {
            if ind / size == ind % size {
                continue;
            }
            *weight = f(*weight).max(MIN_PHEROMONE);
        }
    }

    /// All edges with their weights, diagonal excluded.
    pub fn iter_edges(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        let size = self.size;
        self.weights
            .iter()
            .enumerate()
            .filter(move |(ind, _)| ind / size != ind % size)
            .map(move |(ind, weight)| ((ind / size, ind % size), *weight))
    }

    pub fn min_weight(&self) -> f64 {
        self.iter_edges()
            .map(|(_, w)| w)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_weight(&self) -> f64 {
        self.iter_edges()
            .map(|(_, w)| w)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
