pub mod database;
pub mod loader;
pub mod schema;

#[cfg(test)]
pub mod memory;

pub use loader::{load_networks, load_stations_per_network, run, LoadReport};
pub use schema::prepare_schema;
