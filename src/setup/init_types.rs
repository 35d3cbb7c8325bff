use serde::{Deserialize, Serialize};

use crate::domain::types::Location;

/// One row of an instance file. Accepts both plain and Solomon-style headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(alias = "CUST NO.", alias = "cust_no")]
    pub id: usize,
    #[serde(alias = "XCOORD.", alias = "xcoord")]
    pub x: f64,
    #[serde(alias = "YCOORD.", alias = "ycoord")]
    pub y: f64,
    #[serde(alias = "DEMAND")]
    pub demand: u64,
    #[serde(alias = "READY TIME", alias = "ready")]
    pub ready_time: f64,
    #[serde(alias = "DUE DATE", alias = "due")]
    pub due_date: f64,
    #[serde(alias = "SERVICE TIME", alias = "service_time")]
    #[serde(default)]
    pub service: f64,
}

impl From<LocationRecord> for Location {
    fn from(r: LocationRecord) -> Self {
        Location::new(r.id, r.x, r.y, r.demand, r.ready_time, r.due_date, r.service)
    }
}

/// JSON instance layout. `vehicle_capacity` falls back to the configured one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceFile {
    #[serde(default)]
    pub vehicle_capacity: Option<u64>,
    pub warehouse: LocationRecord,
    pub customers: Vec<LocationRecord>,
}
