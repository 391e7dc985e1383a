//! Mapping of service errors onto HTTP responses.

use std::error::Error;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::ChartError;

/// Error returned by HTTP handlers.
///
/// Upstream failures surface as `502 Bad Gateway`, anything else as
/// `500 Internal Server Error`. The body is `{"message": "..."}`.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ChartError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{}: {:?}", self, self.source());

        let status = self.status();
        let payload = Json(json!({"message": self.to_string()}));

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_are_bad_gateway() {
        let err = ApiError(ChartError::Http("connection refused".into()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err = ApiError(ChartError::SiteNotFound("scp-jp".into()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn local_errors_are_internal() {
        let err = ApiError(ChartError::Configuration("bad".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
