//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use irrigator_domain::error::IrrigatorError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`IrrigatorError`] to an HTTP response with appropriate status code.
pub struct ApiError(IrrigatorError);

impl From<IrrigatorError> for ApiError {
    fn from(err: IrrigatorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            IrrigatorError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            IrrigatorError::NotConnected => (StatusCode::CONFLICT, self.0.to_string()),
            IrrigatorError::CommandRejected(message) => (StatusCode::BAD_GATEWAY, message.clone()),
            IrrigatorError::Transport(err) => {
                tracing::error!(error = %err, "device transport error");
                (StatusCode::BAD_GATEWAY, "device unreachable".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
