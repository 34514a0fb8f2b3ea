use std::{env, time::Duration};

use async_trait::async_trait;
use model::{network::Network, station::Station, WithId};
use pipeline::database::{
    Database, DatabaseAutocommit, DatabaseTransaction, NetworkRepo, Result, SchemaRepo,
    StationRepo,
};
use queries::convert_error;
use sqlx::{
    postgres::{PgConnectOptions, PgConnection, PgPoolOptions},
    Connection, Transaction,
};
use utility::id::Id;

pub mod data_model;
pub mod queries;

#[derive(Debug, Clone)]
pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.hostname)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Postgres database backed by a single connection, which is used for every
/// statement of a run.
#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PgDatabaseTransaction<'a> {
    tx: Transaction<'a, sqlx::Postgres>,
}

#[async_trait]
impl<'a> DatabaseTransaction for PgDatabaseTransaction<'a> {
    async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(convert_error)
    }
}

pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl DatabaseAutocommit for PgDatabaseAutocommit {}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: &DatabaseConnectionInfo,
    ) -> core::result::Result<Self, sqlx::Error> {
        let options = database_connection_info.connect_options();

        // the pool keeps retrying a refused connection until its acquire
        // timeout, so the server is reached with a single attempt first.
        PgConnection::connect_with(&options).await?.close().await?;

        // one connection, never reaped or recycled for the rest of the run.
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        log::debug!(
            "connected to {}:{}/{}.",
            database_connection_info.hostname,
            database_connection_info.port,
            database_connection_info.database
        );

        Ok(Self { connection: pool })
    }
}

#[async_trait]
impl Database for PgDatabase {
    type Transaction = PgDatabaseTransaction<'static>;
    type Autocommit = PgDatabaseAutocommit;

    const BULK_INSERT_MAX: usize = 999;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }

    async fn transaction(&self) -> Result<Self::Transaction> {
        let tx: Transaction<'static, sqlx::Postgres> =
            self.connection.begin().await.map_err(convert_error)?;

        Ok(PgDatabaseTransaction { tx })
    }

    async fn close(self) {
        self.connection.close().await;
    }
}

// Schema Repo

#[async_trait]
impl SchemaRepo for PgDatabaseAutocommit {
    async fn drop_tables(&mut self) -> Result<()> {
        queries::schema::drop_tables(&self.pool).await
    }

    async fn create_networks_table(&mut self) -> Result<()> {
        queries::schema::create_networks_table(&self.pool).await
    }

    async fn create_stations_table(&mut self) -> Result<()> {
        queries::schema::create_stations_table(&self.pool).await
    }
}

#[async_trait]
impl<'a> SchemaRepo for PgDatabaseTransaction<'a> {
    async fn drop_tables(&mut self) -> Result<()> {
        queries::schema::drop_tables(&mut *self.tx).await
    }

    async fn create_networks_table(&mut self) -> Result<()> {
        queries::schema::create_networks_table(&mut *self.tx).await
    }

    async fn create_stations_table(&mut self) -> Result<()> {
        queries::schema::create_stations_table(&mut *self.tx).await
    }
}

// Network Repo

#[async_trait]
impl NetworkRepo for PgDatabaseAutocommit {
    async fn put_networks(&mut self, networks: &[WithId<Network>]) -> Result<u64> {
        queries::network::put_all(&self.pool, networks).await
    }

    async fn networks(&mut self) -> Result<Vec<WithId<Network>>> {
        queries::network::get_all(&self.pool).await
    }
}

#[async_trait]
impl<'a> NetworkRepo for PgDatabaseTransaction<'a> {
    async fn put_networks(&mut self, networks: &[WithId<Network>]) -> Result<u64> {
        queries::network::put_all(&mut *self.tx, networks).await
    }

    async fn networks(&mut self) -> Result<Vec<WithId<Network>>> {
        queries::network::get_all(&mut *self.tx).await
    }
}

// Station Repo

#[async_trait]
impl StationRepo for PgDatabaseAutocommit {
    async fn put_stations(&mut self, stations: &[WithId<Station>]) -> Result<u64> {
        queries::station::put_all(&self.pool, stations).await
    }

    async fn stations_of_network(
        &mut self,
        network_id: &Id<Network>,
    ) -> Result<Vec<WithId<Station>>> {
        queries::station::get_by_network(&self.pool, network_id).await
    }
}

#[async_trait]
impl<'a> StationRepo for PgDatabaseTransaction<'a> {
    async fn put_stations(&mut self, stations: &[WithId<Station>]) -> Result<u64> {
        queries::station::put_all(&mut *self.tx, stations).await
    }

    async fn stations_of_network(
        &mut self,
        network_id: &Id<Network>,
    ) -> Result<Vec<WithId<Station>>> {
        queries::station::get_by_network(&mut *self.tx, network_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn unreachable() -> DatabaseConnectionInfo {
        DatabaseConnectionInfo {
            username: "getdata".to_owned(),
            password: "getdata".to_owned(),
            hostname: "127.0.0.1".to_owned(),
            // nothing listens on tcpmux
            port: 1,
            database: "citybikes".to_owned(),
        }
    }

    #[tokio::test]
    async fn refused_connection_fails_without_retrying() {
        let started = Instant::now();
        let result = PgDatabase::connect(&unreachable()).await;

        assert!(matches!(result, Err(sqlx::Error::Io(_))));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
