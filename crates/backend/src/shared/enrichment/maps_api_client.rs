use async_trait::async_trait;
use contracts::domain::a001_car::aggregate::Address;
use reqwest::StatusCode;
use std::time::Duration;

use super::types::{EnrichmentError, MapsClient};

/// HTTP client of the maps service
pub struct MapsApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl MapsApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MapsClient for MapsApiClient {
    async fn get_address(&self, lat: f64, lon: f64) -> Result<Address, EnrichmentError> {
        let url = format!("{}/maps", self.base_url);
        tracing::debug!("Maps API: GET {} (lat={}, lon={})", url, lat, lon);

        let response = self
            .client
            .get(&url)
            .query(&[("lat", lat), ("lon", lon)])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NotFound(format!(
                "no address for ({}, {})",
                lat, lon
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Address>()
            .await
            .map_err(|e| EnrichmentError::Decode(format!("address response from {}: {}", url, e)))
    }
}
