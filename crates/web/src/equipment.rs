use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use gymtrack_domain::{Equipment, EquipmentService};
use gymtrack_storage::document::EquipmentDocument;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/equipment", post(create_equipment).get(list_equipment))
        .route(
            "/api/equipment/{id}",
            get(get_equipment).put(update_equipment).delete(delete_equipment),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEquipmentRequest {
    name: String,
    description: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    muscle_groups: Vec<String>,
    #[serde(default)]
    gym_id: Option<Uuid>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    safety_tips: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEquipmentRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    muscle_groups: Option<Vec<String>>,
    #[serde(default)]
    gym_id: Option<Uuid>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    is_available: Option<bool>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    safety_tips: Option<Vec<String>>,
}

async fn create_equipment(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateEquipmentRequest>,
) -> ApiResult<(StatusCode, Json<EquipmentDocument>)> {
    let instructor = principal.into_instructor()?;

    let document = EquipmentDocument {
        id: Uuid::nil(),
        instructor_id: *instructor.id,
        gym_id: request.gym_id,
        name: request.name,
        description: request.description,
        category: request.category.unwrap_or_else(|| String::from("strength")),
        muscle_groups: request.muscle_groups,
        image: request.image,
        is_available: true,
        difficulty: request
            .difficulty
            .unwrap_or_else(|| String::from("intermediate")),
        safety_tips: request.safety_tips,
        usage_count: 0,
    };
    let equipment = Equipment::try_from(document)?;

    let equipment = state.service.create_equipment(equipment).await?;
    Ok((
        StatusCode::CREATED,
        Json(EquipmentDocument::from(&equipment)),
    ))
}

async fn list_equipment(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<EquipmentDocument>>> {
    let instructor = principal.into_instructor()?;
    let equipment = state.service.get_equipment(instructor.id).await?;
    Ok(Json(equipment.iter().map(EquipmentDocument::from).collect()))
}

async fn get_equipment(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EquipmentDocument>> {
    let equipment = state.service.get_equipment_item(id.into()).await?;
    Ok(Json(EquipmentDocument::from(&equipment)))
}

async fn update_equipment(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEquipmentRequest>,
) -> ApiResult<Json<EquipmentDocument>> {
    principal.into_instructor()?;

    let equipment = state.service.get_equipment_item(id.into()).await?;
    let mut document = EquipmentDocument::from(&equipment);
    if let Some(name) = request.name {
        document.name = name;
    }
    if let Some(description) = request.description {
        document.description = description;
    }
    if let Some(category) = request.category {
        document.category = category;
    }
    if let Some(muscle_groups) = request.muscle_groups {
        document.muscle_groups = muscle_groups;
    }
    if let Some(gym_id) = request.gym_id {
        document.gym_id = Some(gym_id);
    }
    if let Some(image) = request.image {
        document.image = Some(image);
    }
    if let Some(is_available) = request.is_available {
        document.is_available = is_available;
    }
    if let Some(difficulty) = request.difficulty {
        document.difficulty = difficulty;
    }
    if let Some(safety_tips) = request.safety_tips {
        document.safety_tips = safety_tips;
    }
    let equipment = Equipment::try_from(document)?;

    let equipment = state.service.update_equipment(equipment).await?;
    Ok(Json(EquipmentDocument::from(&equipment)))
}

async fn delete_equipment(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    principal.into_instructor()?;
    let id = state.service.delete_equipment(id.into()).await?;
    Ok(Json(serde_json::json!({ "deleted": *id })))
}
