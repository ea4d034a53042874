use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use gymtrack_domain::{Gym, GymService};
use gymtrack_storage::document::{GymDocument, GymEquipmentDocument, LocationDocument};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/gyms", post(create_gym).get(list_gyms))
        .route(
            "/api/gyms/{id}",
            get(get_gym).put(update_gym).delete(delete_gym),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGymRequest {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
    location: LocationDocument,
    phone: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    equipments: Vec<GymEquipmentDocument>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateGymRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    location: Option<LocationDocument>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    equipments: Option<Vec<GymEquipmentDocument>>,
}

async fn create_gym(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateGymRequest>,
) -> ApiResult<(StatusCode, Json<GymDocument>)> {
    principal.into_instructor()?;

    let document = GymDocument {
        id: Uuid::nil(),
        name: request.name,
        description: request.description,
        image: request.image,
        location: request.location,
        phone: request.phone,
        email: request.email,
        equipments: request.equipments,
        instructors: vec![],
        students: vec![],
    };
    let gym = Gym::try_from(document)?;

    let gym = state.service.create_gym(gym).await?;
    Ok((StatusCode::CREATED, Json(GymDocument::from(&gym))))
}

async fn list_gyms(
    State(state): State<AppState>,
    _principal: Principal,
) -> ApiResult<Json<Vec<GymDocument>>> {
    let gyms = state.service.get_gyms().await?;
    Ok(Json(gyms.iter().map(GymDocument::from).collect()))
}

async fn get_gym(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<GymDocument>> {
    let gym = state.service.get_gym(id.into()).await?;
    Ok(Json(GymDocument::from(&gym)))
}

async fn update_gym(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateGymRequest>,
) -> ApiResult<Json<GymDocument>> {
    principal.into_instructor()?;

    let gym = state.service.get_gym(id.into()).await?;
    let mut document = GymDocument::from(&gym);
    if let Some(name) = request.name {
        document.name = name;
    }
    if let Some(description) = request.description {
        document.description = Some(description);
    }
    if let Some(image) = request.image {
        document.image = Some(image);
    }
    if let Some(location) = request.location {
        document.location = location;
    }
    if let Some(phone) = request.phone {
        document.phone = phone;
    }
    if let Some(email) = request.email {
        document.email = Some(email);
    }
    if let Some(equipments) = request.equipments {
        document.equipments = equipments;
    }
    let gym = Gym::try_from(document)?;

    let gym = state.service.update_gym(gym).await?;
    Ok(Json(GymDocument::from(&gym)))
}

async fn delete_gym(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    principal.into_instructor()?;
    let id = state.service.delete_gym(id.into()).await?;
    Ok(Json(serde_json::json!({ "deleted": *id })))
}
