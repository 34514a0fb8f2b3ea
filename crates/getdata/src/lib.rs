use std::{error, fmt};

use citybikes::{ApiError, CityBikesClient};
use database::PgDatabase;
use pipeline::{
    database::{Database, DatabaseError},
    LoadReport,
};

pub mod config;

use crate::config::Settings;

#[derive(Debug)]
pub enum Error {
    Config(::config::ConfigError),
    Api(ApiError),
    Database(DatabaseError),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(why) => write!(f, "invalid configuration: {why}"),
            Error::Api(why) => write!(f, "{why}"),
            Error::Database(why) => write!(f, "database error: {why}"),
        }
    }
}

impl From<::config::ConfigError> for Error {
    fn from(why: ::config::ConfigError) -> Self {
        Self::Config(why)
    }
}

impl From<ApiError> for Error {
    fn from(why: ApiError) -> Self {
        Self::Api(why)
    }
}

impl From<DatabaseError> for Error {
    fn from(why: DatabaseError) -> Self {
        Self::Database(why)
    }
}

/// Connects to the database and loads a fresh snapshot of all networks.
///
/// A failed connection is logged and ends the run without touching anything;
/// `Ok(None)` is returned in that case as well as when the network listing
/// could not be fetched.
pub async fn run(settings: Settings) -> Result<Option<LoadReport>, Error> {
    let api =
        CityBikesClient::with_timeout(settings.api.base_url.clone(), settings.api.timeout())?;

    let database = match PgDatabase::connect(&settings.database.connection_info()).await {
        Ok(database) => database,
        Err(why) => {
            log::error!("Error connecting to the database: {why}");
            return Ok(None);
        }
    };

    let result = pipeline::run(&api, &database, settings.options.overwrite).await;
    database.close().await;

    Ok(result?)
}
