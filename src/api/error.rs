use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use snafu::{Location, Snafu};

use crate::store::StoreError;

#[derive(Debug, Snafu)]
pub enum ApiError {
    #[snafu(display("the view counter store is unavailable"), context(false))]
    Store {
        source: StoreError,
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store { source, location } => {
                tracing::error!(error = %source, %location, "request failed: {}", self)
            }
        }

        let content = ErrorResponse {
            message: self.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(content)).into_response()
    }
}
