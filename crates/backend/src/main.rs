pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

use std::sync::Arc;

use domain::a001_car::repository::SeaOrmCarStore;
use domain::a001_car::service::CarService;
use shared::enrichment::{MapsApiClient, PricingApiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;

    let db_path = shared::config::get_database_path(&config)?;
    let conn = shared::data::db::initialize_database(db_path.to_str())
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    let timeout = config.enrichment.timeout();
    let price_client = PricingApiClient::new(&config.pricing.base_url, timeout)?;
    let maps_client = MapsApiClient::new(&config.maps.base_url, timeout)?;
    tracing::info!(
        "Enrichment: pricing at {}, maps at {}, timeout {:?}",
        config.pricing.base_url,
        config.maps.base_url,
        timeout
    );

    let car_service = CarService::new(
        Arc::new(SeaOrmCarStore::new(conn)),
        Arc::new(price_client),
        Arc::new(maps_client),
        timeout,
    );
    let state = routes::AppState {
        car_service: Arc::new(car_service),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(state)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
