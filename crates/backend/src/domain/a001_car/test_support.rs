//! Test doubles for the car store and the enrichment clients.

use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a001_car::aggregate::{Address, Car, CarId};
use contracts::domain::common::{AggregateRoot, EntityMetadata};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::error::CarError;
use super::repository::CarStore;
use super::service::sample_dto;
use crate::shared::enrichment::{EnrichmentError, MapsClient, PriceClient};

/// Unsaved sample car (Chevrolet Impala, USED)
pub fn impala() -> Car {
    Car::from_dto(sample_dto()).expect("sample car is valid")
}

pub fn sample_address() -> Address {
    Address {
        address: "777 Brockton Avenue".into(),
        city: "Abington".into(),
        state: "MA".into(),
        zip: "2351".into(),
    }
}

// ============================================================================
// Store
// ============================================================================

/// `CarStore` over a mutex-guarded map
pub struct InMemoryCarStore {
    state: Mutex<InMemoryState>,
}

struct InMemoryState {
    next_id: i64,
    cars: BTreeMap<i64, Car>,
}

impl Default for InMemoryCarStore {
    fn default() -> Self {
        Self {
            state: Mutex::new(InMemoryState {
                next_id: 1,
                cars: BTreeMap::new(),
            }),
        }
    }
}

#[async_trait]
impl CarStore for InMemoryCarStore {
    async fn save(&self, mut car: Car) -> Result<Car, CarError> {
        let now = Utc::now();
        let mut state = self.state.lock().expect("store lock");
        car.clear_enrichment();

        match car.id {
            None => {
                let id = state.next_id;
                state.next_id += 1;
                car.id = Some(CarId(id));
                *car.metadata_mut() = EntityMetadata::created(now);
                state.cars.insert(id, car.clone());
                Ok(car)
            }
            Some(id) => {
                let stored = state
                    .cars
                    .get_mut(&id.value())
                    .ok_or(CarError::NotFound(id))?;
                stored.condition = car.condition;
                stored.details = car.details;
                stored.location = car.location;
                stored.metadata_mut().touch(now);
                Ok(stored.clone())
            }
        }
    }

    async fn find_by_id(&self, id: CarId) -> Result<Car, CarError> {
        let state = self.state.lock().expect("store lock");
        state
            .cars
            .get(&id.value())
            .cloned()
            .ok_or(CarError::NotFound(id))
    }

    async fn list_all(&self) -> Result<Vec<Car>, CarError> {
        let state = self.state.lock().expect("store lock");
        Ok(state.cars.values().cloned().collect())
    }

    async fn delete_by_id(&self, id: CarId) -> Result<(), CarError> {
        let mut state = self.state.lock().expect("store lock");
        state
            .cars
            .remove(&id.value())
            .map(|_| ())
            .ok_or(CarError::NotFound(id))
    }
}

// ============================================================================
// Enrichment clients
// ============================================================================

/// Price client answering with a fixed price, or failing when `price` is `None`
pub struct FakePriceClient {
    price: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakePriceClient {
    pub fn ok(price: &str) -> Self {
        Self {
            price: Some(price.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            price: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceClient for FakePriceClient {
    async fn get_price(&self, _car_id: CarId) -> Result<String, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.price.clone().ok_or(EnrichmentError::Http {
            status: 503,
            body: "pricing unavailable".into(),
        })
    }
}

/// Maps client answering with a fixed address, or failing when `address` is `None`
pub struct FakeMapsClient {
    address: Option<Address>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeMapsClient {
    pub fn ok(address: Address) -> Self {
        Self {
            address: Some(address),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            address: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MapsClient for FakeMapsClient {
    async fn get_address(&self, _lat: f64, _lon: f64) -> Result<Address, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.address
            .clone()
            .ok_or(EnrichmentError::Network("connection refused".into()))
    }
}
