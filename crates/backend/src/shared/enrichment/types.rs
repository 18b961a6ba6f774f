use async_trait::async_trait;
use contracts::domain::a001_car::aggregate::{Address, CarId};
use thiserror::Error;

/// Failure of a single enrichment lookup. Never fatal for a read.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            EnrichmentError::Timeout
        } else if e.is_decode() {
            EnrichmentError::Decode(e.to_string())
        } else {
            EnrichmentError::Network(e.to_string())
        }
    }
}

/// Price lookup by car id
#[async_trait]
pub trait PriceClient: Send + Sync {
    /// Formatted price, e.g. "USD 15999.99"
    async fn get_price(&self, car_id: CarId) -> Result<String, EnrichmentError>;
}

/// Reverse geocoding of coordinates
#[async_trait]
pub trait MapsClient: Send + Sync {
    async fn get_address(&self, lat: f64, lon: f64) -> Result<Address, EnrichmentError>;
}
