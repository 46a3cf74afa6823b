//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use booking::BookingError;
use cargo_store::RepositoryError;
use domain::CargoError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Booking command error.
    Booking(BookingError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Booking(err) => booking_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn booking_error_to_response(err: BookingError) -> (StatusCode, String) {
    match &err {
        BookingError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        BookingError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        BookingError::Storage(RepositoryError::ConcurrencyConflict { .. }) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        BookingError::Storage(source) => {
            tracing::error!(error = %source, "storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Booking(err)
    }
}

impl From<CargoError> for ApiError {
    fn from(err: CargoError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{TrackingId, Version};

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn booking_errors_map_to_status_codes() {
        assert_eq!(
            status_of(BookingError::InvalidArgument("origin is required".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(BookingError::NotFound(TrackingId::new("X")).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(
                BookingError::Storage(RepositoryError::Corrupt {
                    tracking_id: TrackingId::new("X"),
                    source: CargoError::EmptyHistory,
                })
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn concurrency_conflict_is_409() {
        let err = BookingError::Storage(RepositoryError::ConcurrencyConflict {
            tracking_id: TrackingId::new("X"),
            expected: Version::new(1),
            actual: Version::new(2),
        });
        assert_eq!(status_of(err.into()), StatusCode::CONFLICT);
    }

    #[test]
    fn cargo_errors_are_bad_requests() {
        assert_eq!(
            status_of(CargoError::LocationRequired.into()),
            StatusCode::BAD_REQUEST
        );
    }
}
