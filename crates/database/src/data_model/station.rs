use model::station::Station;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct StationRow {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub free_bikes: i32,
    pub empty_slots: i32,
    pub timestamp: String,
    pub network_id: String,
}

impl DatabaseRow for StationRow {
    type Model = Station;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> Self::Model {
        Station {
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            free_bikes: self.free_bikes,
            empty_slots: self.empty_slots,
            timestamp: self.timestamp,
            network_id: Id::new(self.network_id),
        }
    }
}
