//! Mapping from domain failures to HTTP responses.

use agnos_core::RegistryError;
use agnos_types::TextError;
use api_shared::dto::ErrorRes;
use api_shared::AuthError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// An error response: a status code and the message sent as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorRes {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let status = match &err {
            RegistryError::Validation(_) | RegistryError::UnsupportedHospital(_) => {
                StatusCode::BAD_REQUEST
            }
            RegistryError::AlreadyExists | RegistryError::Conflict(_) => StatusCode::CONFLICT,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            RegistryError::RemoteUnavailable(_)
            | RegistryError::RemoteError { .. }
            | RegistryError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            RegistryError::Database(_) | RegistryError::PasswordHash(_) | RegistryError::Task(_) => {
                tracing::error!("request failed: {:?}", err);
                return Self::internal();
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::WeakSecret | AuthError::Encoding(_) => {
                tracing::error!("token handling failed: {:?}", err);
                Self::internal()
            }
            other => Self::unauthorized(other.to_string()),
        }
    }
}

impl From<TextError> for ApiError {
    fn from(err: TextError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_errors_map_to_statuses() {
        let cases = [
            (RegistryError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (RegistryError::AlreadyExists, StatusCode::CONFLICT),
            (RegistryError::Conflict("dup".into()), StatusCode::CONFLICT),
            (RegistryError::NotFound("patient"), StatusCode::NOT_FOUND),
            (RegistryError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                RegistryError::UnsupportedHospital("hospital-z".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                RegistryError::RemoteError { status: 503 },
                StatusCode::BAD_GATEWAY,
            ),
            (
                RegistryError::Database(sqlx_pool_closed()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::from(RegistryError::Database(sqlx_pool_closed()));
        assert_eq!(err.message, "internal server error");
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        assert_eq!(
            ApiError::from(AuthError::Expired).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::InvalidSignature).status,
            StatusCode::UNAUTHORIZED
        );
    }

    fn sqlx_pool_closed() -> sqlx::Error {
        sqlx::Error::PoolClosed
    }
}
