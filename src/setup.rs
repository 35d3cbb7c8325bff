pub mod init;
pub mod init_types;

pub use init::{load_instance, read_instance_csv, read_instance_json, setup};
