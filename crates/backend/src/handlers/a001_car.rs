use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::a001_car::aggregate::{Car, CarDto, CarId, CarListResponse};
use contracts::domain::common::AggregateId;

use crate::domain::a001_car::error::CarError;
use crate::routes::AppState;

fn parse_id(id: &str) -> Result<CarId, CarError> {
    CarId::from_string(id).map_err(CarError::Validation)
}

fn created(car: Car) -> Response {
    let location = match car.id {
        Some(id) => format!("/cars/{}", id.as_string()),
        None => "/cars".to_string(),
    };
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(car)).into_response()
}

/// GET /cars
pub async fn list_all(State(state): State<AppState>) -> Result<Json<CarListResponse>, CarError> {
    let cars = state.car_service.list().await?;
    Ok(Json(cars.into()))
}

/// GET /cars/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Car>, CarError> {
    let id = parse_id(&id)?;
    Ok(Json(state.car_service.find_by_id(id).await?))
}

/// POST /cars
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CarDto>,
) -> Result<Response, CarError> {
    let car = state.car_service.create(dto).await?;
    Ok(created(car))
}

/// PUT /cars/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<CarDto>,
) -> Result<Json<Car>, CarError> {
    let id = parse_id(&id)?;
    Ok(Json(state.car_service.update(id, dto).await?))
}

/// DELETE /cars/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, CarError> {
    let id = parse_id(&id)?;
    state.car_service.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /cars/testdata
pub async fn insert_test_data(State(state): State<AppState>) -> Result<Response, CarError> {
    let car = state.car_service.insert_test_data().await?;
    Ok(created(car))
}
