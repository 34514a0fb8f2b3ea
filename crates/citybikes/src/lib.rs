use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

pub mod client;
pub mod data_model;

pub use client::{CityBikesClient, DEFAULT_BASE_URL};
pub use data_model::{LocationRecord, NetworkRecord, StationRecord};
pub use reqwest::StatusCode;

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: StatusCode,
        url: String,
        response: Option<String>,
    },
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) if !text.is_empty() => {
                    write!(f, "{} {}: {}", status_code.as_u16(), url, text)
                }
                _ => write!(f, "{} {}", status_code.as_u16(), url),
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Read access to a bike share api serving networks and their stations.
#[async_trait]
pub trait BikeShareApi: Send + Sync {
    /// Lists every network the api knows about.
    async fn networks(&self) -> ApiResult<Vec<NetworkRecord>>;

    /// Lists the stations of a single network.
    async fn stations(&self, network_id: &str) -> ApiResult<Vec<StationRecord>>;
}
