use async_trait::async_trait;
use contracts::domain::a001_car::aggregate::CarId;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use super::types::{EnrichmentError, PriceClient};

/// HTTP client of the pricing service
pub struct PricingApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PricingApiClient {
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

/// Response of GET /services/price
#[derive(Debug, Clone, Deserialize)]
pub struct PriceResponse {
    pub currency: String,
    pub price: f64,
}

impl PriceResponse {
    pub fn formatted(&self) -> String {
        format!("{} {:.2}", self.currency, self.price)
    }
}

#[async_trait]
impl PriceClient for PricingApiClient {
    async fn get_price(&self, car_id: CarId) -> Result<String, EnrichmentError> {
        let url = format!("{}/services/price", self.base_url);
        tracing::debug!("Pricing API: GET {} (vehicleId={})", url, car_id);

        let response = self
            .client
            .get(&url)
            .query(&[("vehicleId", car_id.value())])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NotFound(format!(
                "no price for vehicle {}",
                car_id
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let price: PriceResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Decode(format!("price response from {}: {}", url, e)))?;

        Ok(price.formatted())
    }
}
