use env_logger::Env;
use getdata::config::{config_path, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), getdata::Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let path = config_path();
    let settings = Settings::load(&path).map_err(|why| {
        log::error!("could not read {}: {why}", path.display());
        why
    })?;

    getdata::run(settings).await?;
    Ok(())
}
