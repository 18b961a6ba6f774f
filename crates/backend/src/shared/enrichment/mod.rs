pub mod maps_api_client;
pub mod pricing_api_client;
pub mod types;

pub use maps_api_client::MapsApiClient;
pub use pricing_api_client::PricingApiClient;
pub use types::{EnrichmentError, MapsClient, PriceClient};
