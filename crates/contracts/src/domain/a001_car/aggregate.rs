use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

/// Car identifier, assigned by the store on first persist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(pub i64);

impl CarId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AggregateId for CarId {
    fn as_string(&self) -> String {
        self.0.as_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        let value = i64::from_string(s.trim())?;
        if value <= 0 {
            return Err(format!("Car id must be positive, got {}", value));
        }
        Ok(CarId(value))
    }
}

// ============================================================================
// Value objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Condition {
    New,
    Used,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "NEW",
            Condition::Used => "USED",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Condition::New),
            "USED" => Ok(Condition::Used),
            other => Err(format!("Unknown condition: {}", other)),
        }
    }
}

/// Manufacturer as a plain value (code + name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub code: i32,
    pub name: String,
}

impl Manufacturer {
    pub fn new(code: i32, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }
}

/// Descriptive attributes of a car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub manufacturer: Manufacturer,
    pub model: String,
    pub mileage: i32,
    #[serde(default)]
    pub external_color: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub model_year: Option<i32>,
    #[serde(default)]
    pub production_year: Option<i32>,
    #[serde(default)]
    pub number_of_doors: Option<i32>,
}

impl Details {
    pub fn validate(&self) -> Result<(), String> {
        if self.manufacturer.name.trim().is_empty() {
            return Err("Manufacturer name must not be empty".into());
        }
        if self.model.trim().is_empty() {
            return Err("Model must not be empty".into());
        }
        if self.mileage < 0 {
            return Err(format!("Mileage must not be negative, got {}", self.mileage));
        }
        if let Some(doors) = self.number_of_doors {
            if doors <= 0 {
                return Err(format!("Number of doors must be positive, got {}", doors));
            }
        }
        Ok(())
    }
}

/// Resolved street address, as returned by the maps service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Coordinates plus the address derived from them.
///
/// The address fields are only ever written by enrichment, all four at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            address: None,
            city: None,
            state: None,
            zip: None,
        }
    }

    pub fn apply_address(&mut self, resolved: Address) {
        self.address = Some(resolved.address);
        self.city = Some(resolved.city);
        self.state = Some(resolved.state);
        self.zip = Some(resolved.zip);
    }

    pub fn clear_address(&mut self) {
        self.address = None;
        self.city = None;
        self.state = None;
        self.zip = None;
    }

    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("Latitude must be within [-90, 90], got {}", self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(format!(
                "Longitude must be within [-180, 180], got {}",
                self.lon
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// A vehicle record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CarId>,

    #[serde(flatten)]
    pub metadata: EntityMetadata,

    pub condition: Condition,
    pub details: Details,
    pub location: Location,

    /// Display-only, filled by enrichment and never persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl Car {
    /// Create an unsaved car
    pub fn new(condition: Condition, details: Details, location: Location) -> Self {
        let mut car = Self {
            id: None,
            metadata: EntityMetadata::default(),
            condition,
            details,
            location,
            price: None,
        };
        car.clear_enrichment();
        car
    }

    /// Build an unsaved car from a request payload, rejecting missing parts
    pub fn from_dto(dto: CarDto) -> Result<Self, String> {
        let (condition, details, location) = dto.into_parts()?;
        let car = Self::new(condition, details, location);
        car.validate()?;
        Ok(car)
    }

    /// Replace condition, details and location; id and timestamps stay
    pub fn update(&mut self, dto: CarDto) -> Result<(), String> {
        let (condition, details, location) = dto.into_parts()?;
        details.validate()?;
        location.validate()?;
        self.condition = condition;
        self.details = details;
        self.location = location;
        self.clear_enrichment();
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        self.details.validate()?;
        self.location.validate()
    }

    /// Drop price and address so a response never mixes results of different reads
    pub fn clear_enrichment(&mut self) {
        self.price = None;
        self.location.clear_address();
    }
}

impl AggregateRoot for Car {
    type Id = CarId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "car"
    }

    fn element_name() -> &'static str {
        "Car"
    }

    fn list_name() -> &'static str {
        "Cars"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Payload for create/update. Every part is optional on the wire so that a
/// missing part is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CarDto {
    pub condition: Option<Condition>,
    pub details: Option<Details>,
    pub location: Option<Location>,
}

impl CarDto {
    fn into_parts(self) -> Result<(Condition, Details, Location), String> {
        let condition = self.condition.ok_or("Condition is required")?;
        let details = self.details.ok_or("Details are required")?;
        let mut location = self.location.ok_or("Location is required")?;
        location.clear_address();
        Ok((condition, details, location))
    }
}

impl From<&Car> for CarDto {
    fn from(car: &Car) -> Self {
        Self {
            condition: Some(car.condition),
            details: Some(car.details.clone()),
            location: Some(car.location.clone()),
        }
    }
}

/// Envelope of `GET /cars`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarListResponse {
    #[serde(rename = "_embedded")]
    pub embedded: CarList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarList {
    #[serde(rename = "carList")]
    pub car_list: Vec<Car>,
}

impl From<Vec<Car>> for CarListResponse {
    fn from(car_list: Vec<Car>) -> Self {
        Self {
            embedded: CarList { car_list },
        }
    }
}
