use pipeline::database::Result;
use sqlx::{Executor, Postgres};

use super::convert_error;

pub const DROP_TABLES: &str = "DROP TABLE IF EXISTS networks, stations;";

pub const CREATE_NETWORKS_TABLE: &str = "
    CREATE TABLE networks (
        id text PRIMARY KEY,
        name text NOT NULL,
        city text NOT NULL,
        country text NOT NULL,
        latitude double precision NOT NULL,
        longitude double precision NOT NULL
    );
";

pub const CREATE_STATIONS_TABLE: &str = "
    CREATE TABLE stations (
        id text PRIMARY KEY,
        name text NOT NULL,
        latitude double precision NOT NULL,
        longitude double precision NOT NULL,
        free_bikes integer NOT NULL DEFAULT 0,
        empty_slots integer NOT NULL DEFAULT 0,
        timestamp text NOT NULL,
        network_id text NOT NULL,
        FOREIGN KEY (network_id) REFERENCES networks (id)
    );
";

async fn execute<'c, E>(executor: E, statement: &str) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(statement)
        .execute(executor)
        .await
        .map_err(convert_error)?;
    Ok(())
}

pub async fn drop_tables<'c, E>(executor: E) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    execute(executor, DROP_TABLES).await
}

pub async fn create_networks_table<'c, E>(executor: E) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    execute(executor, CREATE_NETWORKS_TABLE).await
}

pub async fn create_stations_table<'c, E>(executor: E) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    execute(executor, CREATE_STATIONS_TABLE).await
}
