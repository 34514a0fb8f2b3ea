use model::network::Network;
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct NetworkRow {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl DatabaseRow for NetworkRow {
    type Model = Network;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> Self::Model {
        Network {
            name: self.name,
            city: self.city,
            country: self.country,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
