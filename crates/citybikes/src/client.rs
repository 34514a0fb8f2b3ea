use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    data_model::{NetworkDetailResponse, NetworkRecord, NetworksResponse, StationRecord},
    ApiError, ApiResult, BikeShareApi,
};

pub const DEFAULT_BASE_URL: &str = "http://api.citybik.es/v2";

#[derive(Debug, Clone)]
pub struct CityBikesClient {
    base_url: String,
    http: reqwest::Client,
}

impl CityBikesClient {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Like [`CityBikesClient::new`], but every request gives up after
    /// `timeout`. Without a timeout a stalled endpoint blocks forever.
    pub fn with_timeout<S: Into<String>>(
        base_url: S,
        timeout: Option<Duration>,
    ) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.into(),
            http: builder.build()?,
        })
    }

    pub fn networks_url(&self) -> String {
        format!("{}/networks", self.base_url.trim_end_matches('/'))
    }

    pub fn network_url(&self, network_id: &str) -> String {
        format!("{}/{}", self.networks_url(), network_id)
    }

    /// Fetch and parse a json document. Any status other than success is
    /// turned into [`ApiError::InvalidResponse`].
    async fn get<T: DeserializeOwned>(&self, url: String) -> ApiResult<T> {
        log::debug!("Requesting '{url}'.");

        let response = self.http.get(&url).send().await?;

        let status_code = response.status();
        if !status_code.is_success() {
            return Err(ApiError::InvalidResponse {
                status_code,
                url,
                response: response.text().await.ok(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for CityBikesClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl BikeShareApi for CityBikesClient {
    async fn networks(&self) -> ApiResult<Vec<NetworkRecord>> {
        let response: NetworksResponse = self.get(self.networks_url()).await?;
        Ok(response.networks)
    }

    async fn stations(&self, network_id: &str) -> ApiResult<Vec<StationRecord>> {
        let response: NetworkDetailResponse =
            self.get(self.network_url(network_id)).await?;
        Ok(response.network.stations)
    }
}
