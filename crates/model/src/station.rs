use serde::Serialize;
use utility::id::{HasId, Id};

use crate::network::Network;

/// A docking point of a [`Network`], carrying the live bike and slot counts
/// at the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub free_bikes: i32,
    pub empty_slots: i32,
    /// Passed through verbatim from the api, usually ISO 8601.
    pub timestamp: String,
    pub network_id: Id<Network>,
}

impl HasId for Station {
    type IdType = String;
}
