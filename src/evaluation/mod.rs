pub mod feasibility;
pub mod fitness;

pub use feasibility::{
    check_instance_feasibility, deliverable, is_deliverable, is_reachable, reachable,
};
pub use fitness::{cost_to, distance, find_route_cost, find_route_length, find_solution_cost};
