use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iss_core::EphemerisError;
use thiserror::Error;

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Ephemeris(
                e @ (EphemerisError::EmptyStore
                | EphemerisError::EpochNotFound(_)
                | EphemerisError::InvalidParameter),
            ) => (StatusCode::NOT_FOUND, format!("{}\n", e)),
            AppError::Ephemeris(e @ (EphemerisError::Fetch(_) | EphemerisError::Parse(_))) => {
                tracing::error!("Ephemeris refresh failed: {}", e);
                (StatusCode::BAD_GATEWAY, format!("{}\n", e))
            }
            AppError::Ephemeris(e @ EphemerisError::MalformedEpoch(_)) => {
                tracing::error!("Stored data is inconsistent: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", e))
            }
        };

        (status, body).into_response()
    }
}
