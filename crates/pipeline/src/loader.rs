use std::fmt;

use citybikes::{BikeShareApi, NetworkRecord};
use model::{network::Network, station::Station, WithId};
use utility::id::Id;

use crate::{
    database::{
        Database, DatabaseTransaction as _, NetworkRepo as _, Result, StationRepo as _,
    },
    schema::prepare_schema,
};

/// Outcome of a single run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub networks: u64,
    pub stations: u64,
    /// networks whose stations could not be fetched.
    pub skipped_networks: Vec<Id<Network>>,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "inserted {} networks and {} stations, skipped {} networks",
            self.networks,
            self.stations,
            self.skipped_networks.len()
        )
    }
}

/// Prepares the schema and loads all networks and their stations.
///
/// Returns `None` if the networks could not be fetched, in which case nothing
/// was written. Database errors abort the run.
pub async fn run<A, D>(api: &A, database: &D, overwrite: bool) -> Result<Option<LoadReport>>
where
    A: BikeShareApi,
    D: Database,
{
    prepare_schema(database, overwrite).await;

    log::info!("Fetching and inserting data...");
    let Some(networks) = load_networks(api, database).await? else {
        return Ok(None);
    };

    let mut report = load_stations_per_network(api, database, &networks).await?;
    report.networks = networks.len() as u64;

    log::debug!("{report}");
    Ok(Some(report))
}

/// Fetches the list of networks and inserts all of them within one
/// transaction. Returns the inserted networks, or `None` if the fetch failed.
pub async fn load_networks<A, D>(
    api: &A,
    database: &D,
) -> Result<Option<Vec<WithId<Network>>>>
where
    A: BikeShareApi,
    D: Database,
{
    let records = match api.networks().await {
        Ok(records) => records,
        Err(why) => {
            log::error!("Error fetching data: {why}");
            return Ok(None);
        }
    };

    let networks = records
        .into_iter()
        .map(NetworkRecord::into_model)
        .collect::<Vec<_>>();

    let mut tx = database.transaction().await?;
    for chunk in networks.chunks(D::BULK_INSERT_MAX) {
        tx.put_networks(chunk).await?;
    }
    tx.commit().await?;

    log::debug!("inserted {} networks.", networks.len());
    Ok(Some(networks))
}

/// Fetches and inserts the stations of every network, one transaction per
/// network. A network whose stations can not be fetched is skipped.
pub async fn load_stations_per_network<A, D>(
    api: &A,
    database: &D,
    networks: &[WithId<Network>],
) -> Result<LoadReport>
where
    A: BikeShareApi,
    D: Database,
{
    let mut report = LoadReport::default();

    for network in networks {
        let records = match api.stations(network.id.raw_ref::<str>()).await {
            Ok(records) => records,
            Err(why) => {
                log::error!("Error fetching data for network {}: {why}", network.id);
                report.skipped_networks.push(network.id.clone());
                continue;
            }
        };

        let stations = records
            .into_iter()
            .map(|record| record.into_model(&network.id))
            .collect::<Vec<_>>();

        report.stations += insert_stations(database, &stations).await?;
        log::debug!("inserted {} stations of {}.", stations.len(), network.id);
    }

    Ok(report)
}

async fn insert_stations<D: Database>(
    database: &D,
    stations: &[WithId<Station>],
) -> Result<u64> {
    let mut tx = database.transaction().await?;
    let mut inserted = 0;
    for chunk in stations.chunks(D::BULK_INSERT_MAX) {
        inserted += tx.put_stations(chunk).await?;
    }
    tx.commit().await?;
    Ok(inserted)
}
