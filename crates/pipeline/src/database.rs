use std::{error, fmt, result};

use async_trait::async_trait;
use model::{network::Network, station::Station, WithId};
use utility::id::Id;

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    /// A table which is about to be created exists already.
    AlreadyExists(String),
    /// A primary or foreign key constraint was violated.
    Constraint(String),
    Other(Box<dyn error::Error + Send + Sync>),
}

impl DatabaseError {
    pub fn other<E>(why: E) -> Self
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Self::Other(why.into())
    }
}

impl error::Error for DatabaseError {}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DatabaseError::NotFound => write!(f, "not found"),
            DatabaseError::AlreadyExists(what) => write!(f, "{what} already exists"),
            DatabaseError::Constraint(why) => write!(f, "constraint violated: {why}"),
            DatabaseError::Other(why) => write!(f, "{why}"),
        }
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// Creation and removal of the `networks` and `stations` tables.
#[async_trait]
pub trait SchemaRepo {
    /// drops both tables, if they exist.
    async fn drop_tables(&mut self) -> Result<()>;

    async fn create_networks_table(&mut self) -> Result<()>;

    /// requires the `networks` table, as stations reference it.
    async fn create_stations_table(&mut self) -> Result<()>;
}

#[async_trait]
pub trait NetworkRepo {
    /// inserts all networks with a single statement.
    ///
    /// ## Warning
    ///
    /// Push at most `Database::BULK_INSERT_MAX` networks at once. Existing ids
    /// are not updated but fail the whole statement.
    async fn put_networks(&mut self, networks: &[WithId<Network>]) -> Result<u64>;

    async fn networks(&mut self) -> Result<Vec<WithId<Network>>>;
}

#[async_trait]
pub trait StationRepo {
    /// inserts all stations with a single statement.
    ///
    /// ## Warning
    ///
    /// Push at most `Database::BULK_INSERT_MAX` stations at once. Every
    /// station has to reference an already inserted network.
    async fn put_stations(&mut self, stations: &[WithId<Station>]) -> Result<u64>;

    async fn stations_of_network(
        &mut self,
        network_id: &Id<Network>,
    ) -> Result<Vec<WithId<Station>>>;
}

pub trait DatabaseOperations: SchemaRepo + NetworkRepo + StationRepo {}

impl<T> DatabaseOperations for T where T: SchemaRepo + NetworkRepo + StationRepo {}

/// Changes become visible on `commit`. Dropping the transaction without
/// committing rolls it back.
#[async_trait]
pub trait DatabaseTransaction: DatabaseOperations {
    async fn commit(self) -> Result<()>;
}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// trait to implement a bike share database.
/// a single run uses one database object from start to end.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized {
    type Transaction: DatabaseTransaction + Send;
    type Autocommit: DatabaseAutocommit + Send;

    const BULK_INSERT_MAX: usize;

    async fn transaction(&self) -> Result<Self::Transaction>;

    fn auto(&self) -> Self::Autocommit;

    /// closes the underlying connection.
    async fn close(self);
}
