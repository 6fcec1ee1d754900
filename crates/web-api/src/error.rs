use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::{CacheError, QueueError, RepositoryError};
        use domain::DomainError;

        match error {
            ApplicationError::Domain(DomainError::ValidationError { field, message }) => {
                ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION",
                    format!("{}: {}", field, message),
                )
            }
            ApplicationError::Domain(DomainError::ResourceNotFound {
                resource_type,
                resource_id,
            }) => ApiError::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} {} not found", resource_type, resource_id),
            ),
            ApplicationError::Domain(DomainError::ResourceAlreadyExists {
                resource_type, ..
            }) => ApiError::new(
                StatusCode::CONFLICT,
                "ALREADY_EXISTS",
                format!("{} already exists", resource_type),
            ),
            ApplicationError::Domain(DomainError::InvalidStatusTransition { from, to }) => {
                ApiError::new(
                    StatusCode::CONFLICT,
                    "INVALID_TRANSITION",
                    format!("cannot transition from {} to {}", from, to),
                )
            }
            ApplicationError::Repository(repo_err) => match repo_err {
                RepositoryError::NotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "requested resource not found",
                ),
                RepositoryError::Conflict => {
                    ApiError::new(StatusCode::CONFLICT, "CONFLICT", "resource already exists")
                }
                // 瞬时存储故障：调用方可安全重试（写入路径是幂等的）
                RepositoryError::Storage { message } => ApiError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORAGE_UNAVAILABLE",
                    format!("storage error: {}", message),
                ),
            },
            // broker 不可用同样是瞬时故障，重试安全
            ApplicationError::Queue(QueueError::Broker { message }) => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "QUEUE_UNAVAILABLE",
                format!("queue error: {}", message),
            ),
            ApplicationError::Queue(err) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "QUEUE_ERROR",
                format!("queue error: {}", err),
            ),
            ApplicationError::Cache(CacheError::Connection { message }) => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "CACHE_UNAVAILABLE",
                format!("cache error: {}", message),
            ),
            ApplicationError::Cache(err) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CACHE_ERROR",
                format!("cache error: {}", err),
            ),
            ApplicationError::Password(err) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "PASSWORD_ERROR",
                format!("password error: {}", err),
            ),
            ApplicationError::Serialization(err) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "SERIALIZATION_ERROR",
                format!("serialization error: {}", err),
            ),
            ApplicationError::Authentication => {
                ApiError::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "invalid credentials")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
