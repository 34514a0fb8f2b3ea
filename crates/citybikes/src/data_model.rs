//! Records as served by the CityBikes v2 api.
//!
//! The api is loose about which keys it sends, so every field falls back to
//! its type default when the key is missing or explicitly `null`.

use model::{network::Network, station::Station, WithId};
use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};
use utility::id::Id;

/// Body of `GET /networks`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworksResponse {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub networks: Vec<NetworkRecord>,
}

/// Body of `GET /networks/{id}`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkDetailResponse {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub network: NetworkDetail,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkDetail {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub stations: Vec<StationRecord>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkRecord {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub location: LocationRecord,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocationRecord {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub city: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub country: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub latitude: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub longitude: f64,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StationRecord {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub latitude: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub longitude: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub free_bikes: i32,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub empty_slots: i32,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub timestamp: String,
}

impl NetworkRecord {
    pub fn into_model(self) -> WithId<Network> {
        WithId::new(
            Id::new(self.id),
            Network {
                name: self.name,
                city: self.location.city,
                country: self.location.country,
                latitude: self.location.latitude,
                longitude: self.location.longitude,
            },
        )
    }
}

impl StationRecord {
    /// Converts into a station owned by `network_id`.
    pub fn into_model(self, network_id: &Id<Network>) -> WithId<Station> {
        WithId::new(
            Id::new(self.id),
            Station {
                name: self.name,
                latitude: self.latitude,
                longitude: self.longitude,
                free_bikes: self.free_bikes,
                empty_slots: self.empty_slots,
                timestamp: self.timestamp,
                network_id: network_id.clone(),
            },
        )
    }
}
