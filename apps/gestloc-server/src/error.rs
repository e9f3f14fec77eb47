use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use contract_export::ExportError;

/// Errors surfaced by the HTTP API.
///
/// Responses carry a generic French message; the technical cause is only
/// written to the server log.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Lease not found: {0}")]
    LeaseNotFound(String),

    #[error("No landlord profile configured")]
    LandlordMissing,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::LeaseNotFound(id) => {
                tracing::warn!("Lease not found: {}", id);
                (StatusCode::NOT_FOUND, "Bail introuvable".to_string())
            }
            ApiError::LandlordMissing => {
                tracing::warn!("Contract requested but no landlord profile exists");
                (
                    StatusCode::CONFLICT,
                    "Profil du bailleur non renseigné".to_string(),
                )
            }
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Export(e) => {
                tracing::error!("Contract export failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "La génération du document a échoué".to_string(),
                )
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Une erreur interne est survenue".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Une erreur interne est survenue".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
