use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use tracing::error;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// The request could not be decoded (form, JSON, query or path).
    Malformed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(err) => match err {
                DomainError::UserNotFound => StatusCode::NOT_FOUND,
                DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                DomainError::ValidationError(_)
                | DomainError::EmailAlreadyExists(_)
                | DomainError::ProfileAlreadyExists(_)
                | DomainError::RoleConflict(_)
                | DomainError::ProfileRequired
                | DomainError::ContactLimitExceeded { .. } => StatusCode::BAD_REQUEST,
                DomainError::HashingError(_) | DomainError::RepositoryError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

macro_rules! malformed_from_rejection {
    ($($rejection:ty),* $(,)?) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::Malformed(rejection.body_text())
                }
            }
        )*
    };
}

malformed_from_rejection!(
    axum::extract::rejection::FormRejection,
    axum::extract::rejection::JsonRejection,
    axum::extract::rejection::QueryRejection,
    axum::extract::rejection::PathRejection,
);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::Domain(err) if err.is_internal() => {
                error!(error = %err, "request failed");
                "Internal server error".to_string()
            }
            ApiError::Domain(err) => err.to_string(),
            ApiError::Malformed(message) => message,
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}
