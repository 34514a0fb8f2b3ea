use model::{network::Network, station::Station, WithId};
use pipeline::database::Result;
use sqlx::{Executor, Postgres};
use utility::id::Id;

use crate::data_model::{station::StationRow, with_ids};

use super::convert_error;

pub const COLUMNS: &[&str] = &[
    "id",
    "name",
    "latitude",
    "longitude",
    "free_bikes",
    "empty_slots",
    "timestamp",
    "network_id",
];

pub async fn get_by_network<'c, E>(
    executor: E,
    network_id: &Id<Network>,
) -> Result<Vec<WithId<Station>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<StationRow> = sqlx::query_as(
        "
        SELECT
            id, name, latitude, longitude, free_bikes, empty_slots,
            timestamp, network_id
        FROM
            stations
        WHERE
            network_id = $1
        ORDER BY
            id;
        ",
    )
    .bind(network_id.raw_ref::<str>())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;

    Ok(with_ids(rows))
}

pub async fn put_all<'c, E>(executor: E, stations: &[WithId<Station>]) -> Result<u64>
where
    E: Executor<'c, Database = Postgres>,
{
    super::insert_all(executor, "stations", COLUMNS, stations, |query, station| {
        query
            .bind(station.id.raw())
            .bind(station.content.name.clone())
            .bind(station.content.latitude)
            .bind(station.content.longitude)
            .bind(station.content.free_bikes)
            .bind(station.content.empty_slots)
            .bind(station.content.timestamp.clone())
            .bind(station.content.network_id.raw())
    })
    .await
    .map_err(convert_error)
}
