use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use gymtrack_domain::{Cpf, Email, Name, Role, User, UserID, UserService};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(register_user).get(list_users))
        .route("/api/users/{id}", get(get_user))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterUserRequest {
    name: String,
    email: String,
    cpf: String,
    phone: String,
    birth_date: NaiveDate,
    password: String,
    role: String,
    #[serde(default)]
    avatar: Option<String>,
}

/// Account summary without credential material.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    email: String,
    cpf: String,
    phone: String,
    birth_date: NaiveDate,
    role: String,
    avatar: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id,
            name: user.name.to_string(),
            email: user.email.to_string(),
            cpf: user.cpf.to_string(),
            phone: user.phone.clone(),
            birth_date: user.birth_date,
            role: user.role.to_string(),
            avatar: user.avatar.clone(),
        }
    }
}

async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let role = match request.role.as_str() {
        "student" => Role::Student,
        "instructor" => Role::Instructor,
        other => return Err(ApiError::BadRequest(format!("unknown role `{other}`"))),
    };
    let user = User {
        id: UserID::nil(),
        name: Name::new(&request.name).map_err(|err| ApiError::BadRequest(err.to_string()))?,
        email: Email::new(&request.email).map_err(|err| ApiError::BadRequest(err.to_string()))?,
        cpf: Cpf::new(&request.cpf).map_err(|err| ApiError::BadRequest(err.to_string()))?,
        phone: request.phone,
        birth_date: request.birth_date,
        password_hash: request.password,
        role,
        avatar: request.avatar,
    };

    let user = state.service.register_user(user).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

async fn list_users(
    State(state): State<AppState>,
    _principal: Principal,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.service.get_users().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

async fn get_user(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.service.get_user(id.into()).await?;
    Ok(Json(UserResponse::from(&user)))
}
