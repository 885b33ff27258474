//! Error responses: every failure becomes `{"error": "<message>"}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::error::{describe_error_code, MarketplaceError};

pub type ApiResult<T> = std::result::Result<T, MarketplaceError>;

impl MarketplaceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketplaceError::Validation { .. } => StatusCode::BAD_REQUEST,
            MarketplaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            MarketplaceError::Auth { .. } => StatusCode::UNAUTHORIZED,
            MarketplaceError::Forbidden { .. } => StatusCode::FORBIDDEN,
            MarketplaceError::Config { .. }
            | MarketplaceError::Storage { .. }
            | MarketplaceError::Mail { .. }
            | MarketplaceError::Analysis { .. }
            | MarketplaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                "Request failed ({}): {:?}",
                describe_error_code(self.code()),
                self
            );
        } else {
            warn!("Request rejected: {}", self);
        }

        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}
