use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::a001_car::aggregate::CarId;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Car not found: {0}")]
    NotFound(CarId),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<sea_orm::DbErr> for CarError {
    fn from(e: sea_orm::DbErr) -> Self {
        CarError::Persistence(e.to_string())
    }
}

impl CarError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CarError::Validation(_) => StatusCode::BAD_REQUEST,
            CarError::NotFound(_) => StatusCode::NOT_FOUND,
            CarError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CarError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            CarError::Persistence(e) => tracing::error!("Persistence error: {}", e),
            other => tracing::warn!("{}", other),
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
