use contracts::domain::a001_car::aggregate::{Address, Car};
use std::future::Future;
use std::time::Duration;

use crate::shared::enrichment::{EnrichmentError, MapsClient, PriceClient};

/// Enrich a stored car with its price and resolved address.
///
/// Both lookups run concurrently and are individually bounded by `timeout`.
/// Whatever fails is logged and left empty; the car is always returned.
pub async fn enrich_car(
    mut car: Car,
    price_client: &dyn PriceClient,
    maps_client: &dyn MapsClient,
    timeout: Duration,
) -> Car {
    car.clear_enrichment();

    // unsaved cars have nothing to price
    let Some(id) = car.id else {
        return car;
    };
    let (lat, lon) = (car.location.lat, car.location.lon);

    let (price, address) = tokio::join!(
        bounded(timeout, price_client.get_price(id)),
        bounded(timeout, maps_client.get_address(lat, lon)),
    );

    assemble(&mut car, price, address);
    car
}

async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, EnrichmentError>>,
) -> Result<T, EnrichmentError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(EnrichmentError::Timeout),
    }
}

/// Merge lookup results into the display fields of `car`
pub fn assemble(
    car: &mut Car,
    price: Result<String, EnrichmentError>,
    address: Result<Address, EnrichmentError>,
) {
    let id = car.id.map(|id| id.value()).unwrap_or_default();

    match price {
        Ok(price) => car.price = Some(price),
        Err(e) => tracing::warn!("Price unknown for car {}: {}", id, e),
    }

    match address {
        Ok(resolved) => car.location.apply_address(resolved),
        Err(e) => tracing::warn!("Address unknown for car {}: {}", id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_car::test_support::{
        impala, sample_address, FakeMapsClient, FakePriceClient,
    };
    use contracts::domain::a001_car::aggregate::CarId;
    use std::time::Instant;

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn stored_impala() -> Car {
        let mut car = impala();
        car.id = Some(CarId(1));
        car
    }

    #[tokio::test]
    async fn test_both_lookups_succeed() {
        let price = FakePriceClient::ok("USD 15999.99");
        let maps = FakeMapsClient::ok(sample_address());

        let car = enrich_car(stored_impala(), &price, &maps, TIMEOUT).await;

        assert_eq!(car.price.as_deref(), Some("USD 15999.99"));
        assert_eq!(car.location.address.as_deref(), Some("777 Brockton Avenue"));
        assert_eq!(car.location.zip.as_deref(), Some("2351"));
        assert_eq!(price.calls(), 1);
        assert_eq!(maps.calls(), 1);
    }

    #[tokio::test]
    async fn test_price_failure_keeps_address() {
        let price = FakePriceClient::failing();
        let maps = FakeMapsClient::ok(sample_address());

        let car = enrich_car(stored_impala(), &price, &maps, TIMEOUT).await;

        assert!(car.price.is_none());
        assert!(car.location.has_address());
    }

    #[tokio::test]
    async fn test_address_failure_keeps_price() {
        let price = FakePriceClient::ok("USD 1.00");
        let maps = FakeMapsClient::failing();

        let car = enrich_car(stored_impala(), &price, &maps, TIMEOUT).await;

        assert_eq!(car.price.as_deref(), Some("USD 1.00"));
        assert!(!car.location.has_address());
        assert!(car.location.city.is_none());
    }

    #[tokio::test]
    async fn test_slow_lookup_is_bounded_and_treated_as_unknown() {
        let price = FakePriceClient::ok("USD 1.00").with_delay(Duration::from_secs(5));
        let maps = FakeMapsClient::ok(sample_address());

        let started = Instant::now();
        let car = enrich_car(stored_impala(), &price, &maps, TIMEOUT).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(car.price.is_none());
        assert!(car.location.has_address());
    }

    #[tokio::test]
    async fn test_lookups_run_concurrently() {
        let delay = Duration::from_millis(150);
        let price = FakePriceClient::ok("USD 1.00").with_delay(delay);
        let maps = FakeMapsClient::ok(sample_address()).with_delay(delay);

        let started = Instant::now();
        let car = enrich_car(stored_impala(), &price, &maps, Duration::from_secs(1)).await;

        assert!(started.elapsed() < delay * 2);
        assert!(car.price.is_some());
        assert!(car.location.has_address());
    }

    #[tokio::test]
    async fn test_stale_enrichment_is_cleared_before_lookup() {
        let mut car = stored_impala();
        car.price = Some("USD 999.00".into());
        car.location.apply_address(sample_address());

        let price = FakePriceClient::failing();
        let maps = FakeMapsClient::failing();
        let car = enrich_car(car, &price, &maps, TIMEOUT).await;

        assert!(car.price.is_none());
        assert!(!car.location.has_address());
    }

    #[tokio::test]
    async fn test_unsaved_car_is_not_looked_up() {
        let price = FakePriceClient::ok("USD 1.00");
        let maps = FakeMapsClient::ok(sample_address());

        let car = enrich_car(impala(), &price, &maps, TIMEOUT).await;

        assert!(car.price.is_none());
        assert_eq!(price.calls(), 0);
        assert_eq!(maps.calls(), 0);
    }
}
