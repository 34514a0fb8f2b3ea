use crate::database::{Database, SchemaRepo as _};

/// (Re)creates the `networks` and `stations` tables.
///
/// Every statement runs on its own. A failing statement is logged and the
/// next one is executed anyway. Returns the number of failed statements.
pub async fn prepare_schema<D: Database>(database: &D, overwrite: bool) -> usize {
    let mut auto = database.auto();
    let mut failed = 0;

    if overwrite {
        log::info!("Dropping existing tables...");
        if let Err(why) = auto.drop_tables().await {
            log::error!("{why}");
            failed += 1;
        }
    }

    log::info!("Creating new tables...");
    if let Err(why) = auto.create_networks_table().await {
        log::error!("{why}");
        failed += 1;
    }
    if let Err(why) = auto.create_stations_table().await {
        log::error!("{why}");
        failed += 1;
    }

    failed
}
