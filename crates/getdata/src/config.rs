use std::{collections::HashMap, env, path::Path, path::PathBuf, time::Duration};

use citybikes::DEFAULT_BASE_URL;
use config::{Config, ConfigError, Environment, File, FileFormat};
use database::DatabaseConnectionInfo;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config.ini";
pub const CONFIG_PATH_VARIABLE: &str = "GETDATA_CONFIG";
pub const ENV_PREFIX: &str = "GETDATA";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub options: Options,
    #[serde(default)]
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Options {
    /// drop and recreate both tables before loading.
    pub overwrite: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl DatabaseSettings {
    pub fn connection_info(&self) -> DatabaseConnectionInfo {
        DatabaseConnectionInfo {
            username: self.user.clone(),
            password: self.password.clone(),
            hostname: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
        }
    }
}

/// `$GETDATA_CONFIG`, falling back to `config.ini` in the working directory.
pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_VARIABLE)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl Settings {
    /// Reads the ini file at `path`. Variables like `GETDATA__DATABASE__PASSWORD`
    /// override the values of the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    fn load_with_env(
        path: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(true))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .source(env),
            )
            .build()?
            .try_deserialize::<Settings>()
    }
}
