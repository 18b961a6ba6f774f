use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a001_car::aggregate::{
    Car, CarId, Condition, Details, Location, Manufacturer,
};
use contracts::domain::common::EntityMetadata;

use sea_orm::entity::prelude::*;

use sea_orm::{ActiveValue::NotSet, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::error::CarError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_car")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub condition: String,
    pub manufacturer_code: i32,
    pub manufacturer_name: String,
    pub model: String,
    pub mileage: i32,
    pub external_color: Option<String>,
    pub body: Option<String>,
    pub engine: Option<String>,
    pub fuel_type: Option<String>,
    pub model_year: Option<i32>,
    pub production_year: Option<i32>,
    pub number_of_doors: Option<i32>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub modified_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Car {
    type Error = CarError;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let condition: Condition = m
            .condition
            .parse()
            .map_err(|e| CarError::Persistence(format!("car {}: {}", m.id, e)))?;

        Ok(Car {
            id: Some(CarId(m.id)),
            metadata: EntityMetadata {
                created_at: Some(m.created_at),
                modified_at: Some(m.modified_at),
            },
            condition,
            details: Details {
                manufacturer: Manufacturer::new(m.manufacturer_code, m.manufacturer_name),
                model: m.model,
                mileage: m.mileage,
                external_color: m.external_color,
                body: m.body,
                engine: m.engine,
                fuel_type: m.fuel_type,
                model_year: m.model_year,
                production_year: m.production_year,
                number_of_doors: m.number_of_doors,
            },
            location: Location::new(m.latitude, m.longitude),
            price: None,
        })
    }
}

/// Persistence of car records
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Insert when `car.id` is empty, otherwise replace the stored record.
    /// Replacing an id that does not exist fails with `NotFound`.
    async fn save(&self, car: Car) -> Result<Car, CarError>;

    async fn find_by_id(&self, id: CarId) -> Result<Car, CarError>;

    /// All cars ordered by id
    async fn list_all(&self) -> Result<Vec<Car>, CarError>;

    async fn delete_by_id(&self, id: CarId) -> Result<(), CarError>;
}

/// `CarStore` backed by the SQLite table `a001_car`
#[derive(Clone)]
pub struct SeaOrmCarStore {
    conn: DatabaseConnection,
}

impl SeaOrmCarStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

/// Columns written on both insert and update; id and timestamps are left to the caller
fn active_model(car: &Car) -> ActiveModel {
    let details = &car.details;
    ActiveModel {
        id: NotSet,
        condition: Set(car.condition.as_str().to_string()),
        manufacturer_code: Set(details.manufacturer.code),
        manufacturer_name: Set(details.manufacturer.name.clone()),
        model: Set(details.model.clone()),
        mileage: Set(details.mileage),
        external_color: Set(details.external_color.clone()),
        body: Set(details.body.clone()),
        engine: Set(details.engine.clone()),
        fuel_type: Set(details.fuel_type.clone()),
        model_year: Set(details.model_year),
        production_year: Set(details.production_year),
        number_of_doors: Set(details.number_of_doors),
        latitude: Set(car.location.lat),
        longitude: Set(car.location.lon),
        created_at: NotSet,
        modified_at: NotSet,
    }
}

#[async_trait]
impl CarStore for SeaOrmCarStore {
    async fn save(&self, car: Car) -> Result<Car, CarError> {
        let now = Utc::now();
        let mut active = active_model(&car);

        match car.id {
            None => {
                active.created_at = Set(now);
                active.modified_at = Set(now);
                let model = active.insert(&self.conn).await?;
                tracing::debug!("Inserted car {}", model.id);
                model.try_into()
            }
            Some(id) => {
                active.id = Set(id.value());
                active.modified_at = Set(now);
                match active.update(&self.conn).await {
                    Ok(model) => model.try_into(),
                    Err(DbErr::RecordNotUpdated) => Err(CarError::NotFound(id)),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    async fn find_by_id(&self, id: CarId) -> Result<Car, CarError> {
        Entity::find_by_id(id.value())
            .one(&self.conn)
            .await?
            .ok_or(CarError::NotFound(id))?
            .try_into()
    }

    async fn list_all(&self) -> Result<Vec<Car>, CarError> {
        Entity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(Car::try_from)
            .collect()
    }

    async fn delete_by_id(&self, id: CarId) -> Result<(), CarError> {
        let result = Entity::delete_by_id(id.value()).exec(&self.conn).await?;
        if result.rows_affected == 0 {
            return Err(CarError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_car::test_support::impala;
    use crate::shared::data::db::connect_in_memory;
    use std::sync::Arc;

    async fn store() -> SeaOrmCarStore {
        SeaOrmCarStore::new(connect_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = store().await;

        let saved = store.save(impala()).await.unwrap();

        assert_eq!(saved.id, Some(CarId(1)));
        assert!(saved.metadata.created_at.is_some());
        assert_eq!(saved.metadata.created_at, saved.metadata.modified_at);
        assert_eq!(saved.details, impala().details);
        assert_eq!(saved.location, impala().location);
        assert_eq!(saved.condition, Condition::Used);
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_created_at() {
        let store = store().await;
        let saved = store.save(impala()).await.unwrap();

        let mut changed = saved.clone();
        changed.condition = Condition::New;
        changed.details.mileage = 40000;
        changed.location = Location::new(41.0, -74.0);
        let updated = store.save(changed).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.metadata.created_at, saved.metadata.created_at);
        assert!(updated.metadata.modified_at >= saved.metadata.modified_at);

        let reloaded = store.find_by_id(CarId(1)).await.unwrap();
        assert_eq!(reloaded.condition, Condition::New);
        assert_eq!(reloaded.details.mileage, 40000);
        assert_eq!(reloaded.location, Location::new(41.0, -74.0));
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_is_not_found() {
        let store = store().await;
        let mut car = impala();
        car.id = Some(CarId(42));

        let err = store.save(car).await.unwrap_err();
        assert!(matches!(err, CarError::NotFound(CarId(42))));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enrichment_fields_are_not_persisted() {
        let store = store().await;
        let mut car = impala();
        car.price = Some("USD 100.00".into());
        car.location.address = Some("1 Main St".into());

        let saved = store.save(car).await.unwrap();
        let reloaded = store.find_by_id(saved.id.unwrap()).await.unwrap();

        assert!(reloaded.price.is_none());
        assert!(!reloaded.location.has_address());
    }

    #[tokio::test]
    async fn test_delete_then_find_and_second_delete_fail() {
        let store = store().await;
        let id = store.save(impala()).await.unwrap().id.unwrap();

        store.delete_by_id(id).await.unwrap();

        assert!(matches!(
            store.find_by_id(id).await,
            Err(CarError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_by_id(id).await,
            Err(CarError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = store().await;
        let first = store.save(impala()).await.unwrap().id.unwrap();
        store.delete_by_id(first).await.unwrap();

        let second = store.save(impala()).await.unwrap().id.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_list_all_is_ordered_by_id() {
        let store = store().await;
        for _ in 0..3 {
            store.save(impala()).await.unwrap();
        }

        let ids: Vec<i64> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|c| c.id.map(|id| id.value()))
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_unique_ids() {
        let store = Arc::new(store().await);
        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.save(impala()).await }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn test_corrupt_condition_is_a_persistence_error() {
        use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

        let store = store().await;
        store.save(impala()).await.unwrap();
        store
            .conn
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                "UPDATE a001_car SET \"condition\" = 'SCRAPPED' WHERE id = 1;".to_string(),
            ))
            .await
            .unwrap();

        assert!(matches!(
            store.find_by_id(CarId(1)).await,
            Err(CarError::Persistence(_))
        ));
    }
}
