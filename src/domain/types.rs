use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::SolverError;
use crate::evaluation::feasibility::check_instance_feasibility;

/// A customer or the warehouse. Identity is by `id`, never by coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub demand: u64,
    pub ready_time: f64,
    pub due_date: f64,
    pub service: f64,
}

impl Location {
    pub fn new(
        id: usize,
        x: f64,
        y: f64,
        demand: u64,
        ready_time: f64,
        due_date: f64,
        service: f64,
    ) -> Self {
        Location {
            id,
            x,
            y,
            demand,
            ready_time,
            due_date,
            service,
        }
    }

    /// Warehouse at the given coordinates: no demand, no service, open until `due_date`.
    pub fn warehouse(id: usize, x: f64, y: f64, due_date: f64) -> Self {
        Location::new(id, x, y, 0, 0.0, due_date, 0.0)
    }
}

/// Visiting order of one vehicle. The warehouse bookends the route implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub warehouse: Location,
    pub customers: Vec<Location>,
}

/// A set of routes together with its total cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub routes: Vec<Route>,
    pub cost: f64,
}

/// Which pheromone update rule a run uses for its whole duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discipline {
    /// Evaporate everything, then every solution of the batch deposits `1 / cost`.
    EvaporateDeposit,
    /// ACS: decay toward a baseline, then only the iteration best reinforces.
    Elitist,
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discipline::EvaporateDeposit => write!(f, "aco"),
            Discipline::Elitist => write!(f, "acs"),
        }
    }
}

impl FromStr for Discipline {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aco" | "evaporate" | "evaporate-deposit" => Ok(Discipline::EvaporateDeposit),
            "acs" | "elitist" => Ok(Discipline::Elitist),
            other => Err(SolverError::InvalidConfig(format!(
                "unknown pheromone discipline '{}' (expected 'aco' or 'acs')",
                other
            ))),
        }
    }
}

/// A validated problem instance.
///
/// Every location gets a dense slot number: the warehouse is slot 0 and
/// customers follow in input order. Slots index the pheromone matrix.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    pub warehouse: Location,
    pub customers: Vec<Location>,
    pub vehicle_capacity: u64,
    slots: HashMap<usize, usize>,
}

impl ProblemInstance {
    /// Validates the input and builds the slot index.
    ///
    /// Malformed data (bad capacity, time windows, duplicate ids) is rejected here.
    /// Customers that are well-formed but can never be served are only detected by
    /// [`ProblemInstance::check_feasibility`].
    pub fn new(
        warehouse: Location,
        customers: Vec<Location>,
        vehicle_capacity: u64,
    ) -> Result<Self, SolverError> {
        if vehicle_capacity == 0 {
            return Err(SolverError::InvalidConfig(
                "vehicle capacity must be positive".to_string(),
            ));
        }
        if customers.is_empty() {
            return Err(SolverError::InvalidConfig(
                "instance has no customers".to_string(),
            ));
        }
        if warehouse.demand != 0 {
            return Err(SolverError::InvalidLocation {
                id: warehouse.id,
                reason: format!("warehouse demand must be 0, got {}", warehouse.demand),
            });
        }
        check_location(&warehouse)?;

        let mut slots = HashMap::with_capacity(customers.len() + 1);
        slots.insert(warehouse.id, 0);

        for (ind, customer) in customers.iter().enumerate() {
            check_location(customer)?;
            if customer.demand == 0 {
                return Err(SolverError::InvalidLocation {
                    id: customer.id,
                    reason: "customer demand must be positive".to_string(),
                });
            }
            if slots.insert(customer.id, ind + 1).is_some() {
                return Err(SolverError::DuplicateLocation(customer.id));
            }
        }

        Ok(ProblemInstance {
            warehouse,
            customers,
            vehicle_capacity,
            slots,
        })
    }

    /// Number of matrix slots (warehouse plus customers).
    pub fn size(&self) -> usize {
        self.customers.len() + 1
    }

    pub fn slot_of(&self, location: &Location) -> Option<usize> {
        self.slots.get(&location.id).copied()
    }

    /// Fails with [`SolverError::InstanceInfeasible`] for the first customer no route can serve.
    pub fn check_feasibility(&self) -> Result<(), SolverError> {
        check_instance_feasibility(self)
    }

    /// Location stored at `slot`.
    pub fn location(&self, slot: usize) -> &Location {
        if slot == 0 {
            &self.warehouse
        } else {
            &self.customers[slot - 1]
        }
    }
}

/// Mutable state of the ant colony search, carried across iterations.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub best_so_far: Option<Solution>,
    pub best_so_far_iteration: usize,
    /// (iteration, cost) every time the global best improved.
    pub best_so_far_updates: Vec<(usize, f64)>,
    /// Global best cost after each iteration.
    pub cost_history: Vec<f64>,
    pub degenerate_draws: usize,
    /// Master generator; hands out one seed per ant.
    pub rng: ChaCha8Rng,
}

impl SearchState {
    pub fn new(seed: u64) -> Self {
        SearchState {
            best_so_far: None,
            best_so_far_iteration: 0,
            best_so_far_updates: vec![],
            cost_history: vec![],
            degenerate_draws: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn best_cost(&self) -> f64 {
        self.best_so_far
            .as_ref()
            .map_or(f64::INFINITY, |solution| solution.cost)
    }
}

fn check_location(location: &Location) -> Result<(), SolverError> {
    let invalid = |reason: &str| SolverError::InvalidLocation {
        id: location.id,
        reason: reason.to_string(),
    };

    if !location.x.is_finite() || !location.y.is_finite() {
        return Err(invalid("coordinates must be finite"));
    }
    if !location.ready_time.is_finite() || !location.due_date.is_finite() {
        return Err(invalid("time window bounds must be finite"));
    }
    if location.ready_time < 0.0 {
        return Err(invalid("ready time must not be negative"));
    }
    if location.due_date < location.ready_time {
        return Err(invalid("due date precedes ready time"));
    }
    if !location.service.is_finite() || location.service < 0.0 {
        return Err(invalid("service time must be finite and not negative"));
    }
    Ok(())
}
