//! A [`Database`] living in memory, with the key and table semantics of the
//! postgres schema. Meant for tests of code generic over [`Database`].

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use indexmap::IndexMap;
use model::{network::Network, station::Station, WithId};
use utility::id::Id;

use crate::database::{
    Database, DatabaseAutocommit, DatabaseError, DatabaseTransaction, NetworkRepo,
    Result, SchemaRepo, StationRepo,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    networks: Option<IndexMap<String, Network>>,
    stations: Option<IndexMap<String, Station>>,
}

fn missing_table(table: &str) -> DatabaseError {
    DatabaseError::other(format!("relation \"{table}\" does not exist"))
}

impl Tables {
    fn drop_tables(&mut self) {
        self.networks = None;
        self.stations = None;
    }

    fn create_networks_table(&mut self) -> Result<()> {
        if self.networks.is_some() {
            return Err(DatabaseError::AlreadyExists("networks".to_owned()));
        }
        self.networks = Some(IndexMap::new());
        Ok(())
    }

    fn create_stations_table(&mut self) -> Result<()> {
        if self.stations.is_some() {
            return Err(DatabaseError::AlreadyExists("stations".to_owned()));
        }
        if self.networks.is_none() {
            return Err(missing_table("networks"));
        }
        self.stations = Some(IndexMap::new());
        Ok(())
    }

    // a statement either inserts all rows or none of them.

    fn insert_networks(&mut self, networks: &[WithId<Network>]) -> Result<u64> {
        let table = self.networks.as_mut().ok_or_else(|| missing_table("networks"))?;
        let mut staged = table.clone();
        for network in networks {
            let id = network.id.raw();
            if staged.contains_key(&id) {
                return Err(DatabaseError::Constraint(format!(
                    "duplicate key value violates unique constraint \"networks_pkey\": {id}"
                )));
            }
            staged.insert(id, network.content.clone());
        }
        *table = staged;
        Ok(networks.len() as u64)
    }

    fn insert_stations(&mut self, stations: &[WithId<Station>]) -> Result<u64> {
        let networks = self.networks.as_ref().ok_or_else(|| missing_table("networks"))?;
        let table = self.stations.as_mut().ok_or_else(|| missing_table("stations"))?;
        let mut staged = table.clone();
        for station in stations {
            let id = station.id.raw();
            if staged.contains_key(&id) {
                return Err(DatabaseError::Constraint(format!(
                    "duplicate key value violates unique constraint \"stations_pkey\": {id}"
                )));
            }
            if !networks.contains_key(station.content.network_id.raw_ref::<str>()) {
                return Err(DatabaseError::Constraint(format!(
                    "station {id} references unknown network {}",
                    station.content.network_id
                )));
            }
            staged.insert(id, station.content.clone());
        }
        *table = staged;
        Ok(stations.len() as u64)
    }

    fn networks(&self) -> Result<Vec<WithId<Network>>> {
        Ok(self
            .networks
            .as_ref()
            .ok_or_else(|| missing_table("networks"))?
            .iter()
            .map(|(id, network)| WithId::new(Id::new(id.clone()), network.clone()))
            .collect())
    }

    fn stations_of_network(&self, network_id: &Id<Network>) -> Result<Vec<WithId<Station>>> {
        Ok(self
            .stations
            .as_ref()
            .ok_or_else(|| missing_table("stations"))?
            .iter()
            .filter(|(_, station)| &station.network_id == network_id)
            .map(|(id, station)| WithId::new(Id::new(id.clone()), station.clone()))
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_table(&self, table: &str) -> bool {
        lock(&self.tables)
            .map(|tables| match table {
                "networks" => tables.networks.is_some(),
                "stations" => tables.stations.is_some(),
                _ => false,
            })
            .unwrap_or(false)
    }

    /// Number of rows across both tables.
    pub fn row_count(&self) -> usize {
        lock(&self.tables)
            .map(|tables| {
                tables.networks.as_ref().map_or(0, IndexMap::len)
                    + tables.stations.as_ref().map_or(0, IndexMap::len)
            })
            .unwrap_or(0)
    }
}

fn lock(tables: &Mutex<Tables>) -> Result<MutexGuard<'_, Tables>> {
    tables
        .lock()
        .map_err(|_| DatabaseError::other("memory database poisoned"))
}

pub struct MemoryTransaction {
    shared: Arc<Mutex<Tables>>,
    tables: Tables,
}

#[async_trait]
impl DatabaseTransaction for MemoryTransaction {
    async fn commit(self) -> Result<()> {
        *lock(&self.shared)? = self.tables;
        Ok(())
    }
}

pub struct MemoryAutocommit {
    shared: Arc<Mutex<Tables>>,
}

impl DatabaseAutocommit for MemoryAutocommit {}

#[async_trait]
impl Database for MemoryDatabase {
    type Transaction = MemoryTransaction;
    type Autocommit = MemoryAutocommit;

    // small, so tests exercise batches spanning several statements
    const BULK_INSERT_MAX: usize = 2;

    async fn transaction(&self) -> Result<Self::Transaction> {
        let tables = lock(&self.tables)?.clone();
        Ok(MemoryTransaction {
            shared: self.tables.clone(),
            tables,
        })
    }

    fn auto(&self) -> Self::Autocommit {
        MemoryAutocommit {
            shared: self.tables.clone(),
        }
    }

    async fn close(self) {}
}

// Schema Repo

#[async_trait]
impl SchemaRepo for MemoryAutocommit {
    async fn drop_tables(&mut self) -> Result<()> {
        lock(&self.shared)?.drop_tables();
        Ok(())
    }

    async fn create_networks_table(&mut self) -> Result<()> {
        lock(&self.shared)?.create_networks_table()
    }

    async fn create_stations_table(&mut self) -> Result<()> {
        lock(&self.shared)?.create_stations_table()
    }
}

#[async_trait]
impl SchemaRepo for MemoryTransaction {
    async fn drop_tables(&mut self) -> Result<()> {
        self.tables.drop_tables();
        Ok(())
    }

    async fn create_networks_table(&mut self) -> Result<()> {
        self.tables.create_networks_table()
    }

    async fn create_stations_table(&mut self) -> Result<()> {
        self.tables.create_stations_table()
    }
}

// Network Repo

#[async_trait]
impl NetworkRepo for MemoryAutocommit {
    async fn put_networks(&mut self, networks: &[WithId<Network>]) -> Result<u64> {
        lock(&self.shared)?.insert_networks(networks)
    }

    async fn networks(&mut self) -> Result<Vec<WithId<Network>>> {
        lock(&self.shared)?.networks()
    }
}

#[async_trait]
impl NetworkRepo for MemoryTransaction {
    async fn put_networks(&mut self, networks: &[WithId<Network>]) -> Result<u64> {
        self.tables.insert_networks(networks)
    }

    async fn networks(&mut self) -> Result<Vec<WithId<Network>>> {
        self.tables.networks()
    }
}

// Station Repo

#[async_trait]
impl StationRepo for MemoryAutocommit {
    async fn put_stations(&mut self, stations: &[WithId<Station>]) -> Result<u64> {
        lock(&self.shared)?.insert_stations(stations)
    }

    async fn stations_of_network(
        &mut self,
        network_id: &Id<Network>,
    ) -> Result<Vec<WithId<Station>>> {
        lock(&self.shared)?.stations_of_network(network_id)
    }
}

#[async_trait]
impl StationRepo for MemoryTransaction {
    async fn put_stations(&mut self, stations: &[WithId<Station>]) -> Result<u64> {
        self.tables.insert_stations(stations)
    }

    async fn stations_of_network(
        &mut self,
        network_id: &Id<Network>,
    ) -> Result<Vec<WithId<Station>>> {
        self.tables.stations_of_network(network_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(id: &str) -> WithId<Network> {
        WithId::new(
            Id::new(id.to_owned()),
            Network {
                name: id.to_owned(),
                city: String::new(),
                country: String::new(),
                latitude: 0.0,
                longitude: 0.0,
            },
        )
    }

    #[tokio::test]
    async fn uncommitted_transaction_is_rolled_back() {
        let database = MemoryDatabase::new();
        let mut auto = database.auto();
        auto.create_networks_table().await.unwrap();

        let mut tx = database.transaction().await.unwrap();
        tx.put_networks(&[network("n1")]).await.unwrap();
        drop(tx);
        assert!(auto.networks().await.unwrap().is_empty());

        let mut tx = database.transaction().await.unwrap();
        tx.put_networks(&[network("n1")]).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(auto.networks().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_key_fails_whole_statement() {
        let database = MemoryDatabase::new();
        let mut auto = database.auto();
        auto.create_networks_table().await.unwrap();

        let result = auto.put_networks(&[network("n1"), network("n1")]).await;
        assert!(matches!(result, Err(DatabaseError::Constraint(_))));
        assert_eq!(database.row_count(), 0);
    }
}
