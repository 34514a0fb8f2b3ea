use serde::Serialize;
use utility::id::HasId;

/// A city or region level bike share system.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub name: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl HasId for Network {
    type IdType = String;
}
