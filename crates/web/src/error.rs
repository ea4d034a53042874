use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gymtrack_domain::{
    CreateError, DeleteError, ReadError, StartSessionError, StorageError, UpdateError,
    ValidationError,
};
use gymtrack_storage::DocumentError;
use log::error;
use serde::Serialize;
use uuid::Uuid;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict {
        message: String,
        session_id: Option<Uuid>,
    },
    Unauthorized(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    session_id: Option<Uuid>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    message,
                    session_id: None,
                },
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message,
                    session_id: None,
                },
            ),
            ApiError::Conflict {
                message,
                session_id,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message,
                    session_id,
                },
            ),
            ApiError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    message,
                    session_id: None,
                },
            ),
            ApiError::Internal(message) => {
                // Log the details, return a generic message.
                error!("internal error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: String::from("internal server error"),
                        session_id: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<ReadError> for ApiError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => ApiError::NotFound(String::from("not found")),
            ReadError::Storage(err) => ApiError::from(err),
            ReadError::Other(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CreateError> for ApiError {
    fn from(value: CreateError) -> Self {
        match value {
            CreateError::Conflict => ApiError::BadRequest(String::from("already exists")),
            CreateError::NotFound => ApiError::NotFound(String::from("not found")),
            CreateError::Storage(err) => ApiError::from(err),
            CreateError::Other(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<UpdateError> for ApiError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::Conflict => {
                ApiError::BadRequest(String::from("conflict with the current state"))
            }
            UpdateError::NotFound => ApiError::NotFound(String::from("not found")),
            UpdateError::Invalid(message) => ApiError::BadRequest(message),
            UpdateError::Storage(err) => ApiError::from(err),
            UpdateError::Other(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<DeleteError> for ApiError {
    fn from(value: DeleteError) -> Self {
        match value {
            DeleteError::NotFound => ApiError::NotFound(String::from("not found")),
            DeleteError::Storage(err) => ApiError::from(err),
            DeleteError::Other(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StartSessionError> for ApiError {
    fn from(value: StartSessionError) -> Self {
        match value {
            StartSessionError::NotFound => ApiError::NotFound(String::from("not found")),
            StartSessionError::NoInstructor => {
                ApiError::BadRequest(String::from("student has no assigned instructor"))
            }
            StartSessionError::AlreadyInProgress { session_id } => ApiError::Conflict {
                message: String::from("a workout session is already in progress"),
                session_id: Some(*session_id),
            },
            StartSessionError::Storage(err) => ApiError::from(err),
            StartSessionError::Other(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        ApiError::BadRequest(value.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(value: StorageError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl From<DocumentError> for ApiError {
    fn from(value: DocumentError) -> Self {
        ApiError::BadRequest(value.to_string())
    }
}
