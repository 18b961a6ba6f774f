use contracts::domain::a001_car::aggregate::{
    Car, CarDto, CarId, Condition, Details, Location, Manufacturer,
};
use std::sync::Arc;
use std::time::Duration;

use super::error::CarError;
use super::repository::CarStore;
use super::service_enrichment::enrich_car;
use crate::shared::enrichment::{MapsClient, PriceClient};

/// Car workflow: persistence through the store, enrichment on every read
pub struct CarService {
    store: Arc<dyn CarStore>,
    price_client: Arc<dyn PriceClient>,
    maps_client: Arc<dyn MapsClient>,
    enrichment_timeout: Duration,
}

impl CarService {
    pub fn new(
        store: Arc<dyn CarStore>,
        price_client: Arc<dyn PriceClient>,
        maps_client: Arc<dyn MapsClient>,
        enrichment_timeout: Duration,
    ) -> Self {
        Self {
            store,
            price_client,
            maps_client,
            enrichment_timeout,
        }
    }

    /// Create a new car. Returned unenriched.
    pub async fn create(&self, dto: CarDto) -> Result<Car, CarError> {
        let car = Car::from_dto(dto).map_err(CarError::Validation)?;
        let saved = self.store.save(car).await?;
        tracing::info!(
            "Created car {} ({} {})",
            saved.id.map(|id| id.value()).unwrap_or_default(),
            saved.details.manufacturer.name,
            saved.details.model
        );
        Ok(saved)
    }

    /// Get a car by id, enriched with price and address
    pub async fn find_by_id(&self, id: CarId) -> Result<Car, CarError> {
        let car = self.store.find_by_id(id).await?;
        Ok(self.enrich(car).await)
    }

    /// All cars, each enriched independently
    pub async fn list(&self) -> Result<Vec<Car>, CarError> {
        let cars = self.store.list_all().await?;
        let mut enriched = Vec::with_capacity(cars.len());
        for car in cars {
            enriched.push(self.enrich(car).await);
        }
        Ok(enriched)
    }

    /// Replace condition, details and location of an existing car. Returned unenriched.
    pub async fn update(&self, id: CarId, dto: CarDto) -> Result<Car, CarError> {
        let mut car = self.store.find_by_id(id).await?;
        car.update(dto).map_err(CarError::Validation)?;
        let saved = self.store.save(car).await?;
        tracing::info!("Updated car {}", id);
        Ok(saved)
    }

    pub async fn delete_by_id(&self, id: CarId) -> Result<(), CarError> {
        self.store.delete_by_id(id).await?;
        tracing::info!("Deleted car {}", id);
        Ok(())
    }

    /// Insert the sample car
    pub async fn insert_test_data(&self) -> Result<Car, CarError> {
        self.create(sample_dto()).await
    }

    async fn enrich(&self, car: Car) -> Car {
        enrich_car(
            car,
            self.price_client.as_ref(),
            self.maps_client.as_ref(),
            self.enrichment_timeout,
        )
        .await
    }
}

pub(crate) fn sample_dto() -> CarDto {
    CarDto {
        condition: Some(Condition::Used),
        details: Some(Details {
            manufacturer: Manufacturer::new(101, "Chevrolet"),
            model: "Impala".into(),
            mileage: 32280,
            external_color: Some("white".into()),
            body: Some("sedan".into()),
            engine: Some("3.6L V6".into()),
            fuel_type: Some("Gasoline".into()),
            model_year: Some(2018),
            production_year: Some(2018),
            number_of_doors: Some(4),
        }),
        location: Some(Location::new(40.730610, -73.935242)),
    }
}
