use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use gymtrack_domain::{
    Instructor, InstructorService, Role, Student, StudentService, User, UserService,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, resolved from the bearer token and passed into the
/// service layer explicitly. The token is the opaque user id; cryptographic
/// token verification is out of scope.
pub enum Principal {
    Student { user: User, student: Student },
    Instructor { user: User, instructor: Instructor },
}

impl Principal {
    pub fn into_student(self) -> Result<Student, ApiError> {
        match self {
            Principal::Student { student, .. } => Ok(student),
            Principal::Instructor { .. } => Err(ApiError::Unauthorized(String::from(
                "student account required",
            ))),
        }
    }

    pub fn into_instructor(self) -> Result<Instructor, ApiError> {
        match self {
            Principal::Instructor { instructor, .. } => Ok(instructor),
            Principal::Student { .. } => Err(ApiError::Unauthorized(String::from(
                "instructor account required",
            ))),
        }
    }
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized(String::from("missing bearer token")))?;

        let user_id = Uuid::parse_str(token.trim())
            .map_err(|_| ApiError::Unauthorized(String::from("invalid token")))?;

        let user = state
            .service
            .get_user(user_id.into())
            .await
            .map_err(|_| ApiError::Unauthorized(String::from("unknown token")))?;

        match user.role {
            Role::Student => {
                let student = state
                    .service
                    .student_by_user(user.id)
                    .await?
                    .ok_or_else(|| {
                        ApiError::Unauthorized(String::from("no student record for account"))
                    })?;
                Ok(Principal::Student { user, student })
            }
            Role::Instructor => {
                let instructor = state
                    .service
                    .instructor_by_user(user.id)
                    .await?
                    .ok_or_else(|| {
                        ApiError::Unauthorized(String::from("no instructor record for account"))
                    })?;
                Ok(Principal::Instructor { user, instructor })
            }
        }
    }
}
