//! # Errores de la API
//! src/error.rs
//!
//! Taxonomía de fallos visibles para el cliente y su envelope JSON:
//!
//! | Variante         | Status | Body                                         |
//! |------------------|--------|----------------------------------------------|
//! | `Validation`     | 400    | `{"error": "Missing required field: salary"}` |
//! | `InvalidRequest` | 400    | `{"error": "Invalid request: ..."}`          |
//! | `NotFound`       | 404    | `{"message": "Not Found"}`                   |
//! | `Store`          | 500    | `{"message": "Internal Error", "error": ...}` |
//! | `Unexpected`     | 500    | `{"message": "Internal Error", "error": ...}` |

use crate::http::StatusCode;
use crate::jobs::storage::StoreError;
use crate::jobs::store::CreateJobError;
use crate::jobs::types::ValidationError;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request HTTP que no se pudo parsear
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not Found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Cualquier otra falla (incluye panics atrapados en el dispatcher)
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidRequest(_) => StatusCode::BadRequest,
            ApiError::NotFound => StatusCode::NotFound,
            ApiError::Store(_) | ApiError::Unexpected(_) => StatusCode::InternalServerError,
        }
    }

    /// Body JSON del error
    pub fn envelope(&self) -> Value {
        match self {
            ApiError::Validation(_) | ApiError::InvalidRequest(_) => {
                json!({ "error": self.to_string() })
            }
            ApiError::NotFound => json!({ "message": "Not Found" }),
            ApiError::Store(_) | ApiError::Unexpected(_) => {
                json!({ "message": "Internal Error", "error": self.to_string() })
            }
        }
    }
}

impl From<CreateJobError> for ApiError {
    fn from(err: CreateJobError) -> Self {
        match err {
            CreateJobError::Validation(e) => ApiError::Validation(e),
            CreateJobError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Unexpected(format!("serialization failed: {}", err))
    }
}
