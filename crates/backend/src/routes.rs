use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::domain::a001_car::service::CarService;
use crate::handlers;

/// Shared state of all handlers
#[derive(Clone)]
pub struct AppState {
    pub car_service: Arc<CarService>,
}

/// Application routes
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // A001 Car handlers
        .route(
            "/cars",
            get(handlers::a001_car::list_all).post(handlers::a001_car::create),
        )
        .route(
            "/cars/testdata",
            post(handlers::a001_car::insert_test_data),
        )
        .route(
            "/cars/:id",
            get(handlers::a001_car::get_by_id)
                .put(handlers::a001_car::update)
                .delete(handlers::a001_car::delete),
        )
        .with_state(state)
}
