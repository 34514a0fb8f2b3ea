use model::{network::Network, WithId};
use pipeline::database::Result;
use sqlx::{Executor, Postgres};

use crate::data_model::{network::NetworkRow, with_ids};

use super::convert_error;

pub const COLUMNS: &[&str] = &["id", "name", "city", "country", "latitude", "longitude"];

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<Network>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<NetworkRow> = sqlx::query_as(
        "
        SELECT
            id, name, city, country, latitude, longitude
        FROM
            networks
        ORDER BY
            id;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?;

    Ok(with_ids(rows))
}

pub async fn put_all<'c, E>(executor: E, networks: &[WithId<Network>]) -> Result<u64>
where
    E: Executor<'c, Database = Postgres>,
{
    super::insert_all(executor, "networks", COLUMNS, networks, |query, network| {
        query
            .bind(network.id.raw())
            .bind(network.content.name.clone())
            .bind(network.content.city.clone())
            .bind(network.content.country.clone())
            .bind(network.content.latitude)
            .bind(network.content.longitude)
    })
    .await
    .map_err(convert_error)
}
