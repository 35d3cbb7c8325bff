pub mod aco;
pub mod constructive;
