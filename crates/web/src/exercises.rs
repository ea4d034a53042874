use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use gymtrack_domain::{Exercise, ExerciseService};
use gymtrack_storage::document::ExerciseDocument;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/exercises", post(create_exercise).get(list_exercises))
        .route(
            "/api/exercises/{id}",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateExerciseRequest {
    name: String,
    #[serde(default)]
    description: Option<String>,
    how_to_perform: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    muscle_groups: Vec<String>,
    #[serde(default)]
    equipment_id: Option<Uuid>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    safety_tips: Option<String>,
    #[serde(default)]
    variations: Vec<String>,
    #[serde(default)]
    video_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateExerciseRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    how_to_perform: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    muscle_groups: Option<Vec<String>>,
    #[serde(default)]
    equipment_id: Option<Uuid>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    safety_tips: Option<String>,
    #[serde(default)]
    variations: Option<Vec<String>>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    is_active: Option<bool>,
}

async fn create_exercise(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateExerciseRequest>,
) -> ApiResult<(StatusCode, Json<ExerciseDocument>)> {
    let instructor = principal.into_instructor()?;

    let document = ExerciseDocument {
        id: Uuid::nil(),
        instructor_id: *instructor.id,
        name: request.name,
        description: request.description,
        how_to_perform: request.how_to_perform,
        category: request.category.unwrap_or_else(|| String::from("strength")),
        muscle_groups: request.muscle_groups,
        equipment_id: request.equipment_id,
        image: request.image,
        difficulty: request
            .difficulty
            .unwrap_or_else(|| String::from("intermediate")),
        safety_tips: request.safety_tips,
        variations: request.variations,
        video_url: request.video_url,
        is_active: true,
        usage_count: 0,
    };
    let exercise = Exercise::try_from(document)?;

    let exercise = state.service.create_exercise(exercise).await?;
    Ok((StatusCode::CREATED, Json(ExerciseDocument::from(&exercise))))
}

async fn list_exercises(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<ExerciseDocument>>> {
    let instructor = principal.into_instructor()?;
    let exercises = state.service.get_exercises(instructor.id).await?;
    Ok(Json(exercises.iter().map(ExerciseDocument::from).collect()))
}

async fn get_exercise(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ExerciseDocument>> {
    let exercise = state.service.get_exercise(id.into()).await?;
    Ok(Json(ExerciseDocument::from(&exercise)))
}

async fn update_exercise(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateExerciseRequest>,
) -> ApiResult<Json<ExerciseDocument>> {
    principal.into_instructor()?;

    let exercise = state.service.get_exercise(id.into()).await?;
    let mut document = ExerciseDocument::from(&exercise);
    if let Some(name) = request.name {
        document.name = name;
    }
    if let Some(description) = request.description {
        document.description = Some(description);
    }
    if let Some(how_to_perform) = request.how_to_perform {
        document.how_to_perform = how_to_perform;
    }
    if let Some(category) = request.category {
        document.category = category;
    }
    if let Some(muscle_groups) = request.muscle_groups {
        document.muscle_groups = muscle_groups;
    }
    if let Some(equipment_id) = request.equipment_id {
        document.equipment_id = Some(equipment_id);
    }
    if let Some(image) = request.image {
        document.image = Some(image);
    }
    if let Some(difficulty) = request.difficulty {
        document.difficulty = difficulty;
    }
    if let Some(safety_tips) = request.safety_tips {
        document.safety_tips = Some(safety_tips);
    }
    if let Some(variations) = request.variations {
        document.variations = variations;
    }
    if let Some(video_url) = request.video_url {
        document.video_url = Some(video_url);
    }
    if let Some(is_active) = request.is_active {
        document.is_active = is_active;
    }
    let exercise = Exercise::try_from(document)?;

    let exercise = state.service.update_exercise(exercise).await?;
    Ok(Json(ExerciseDocument::from(&exercise)))
}

async fn delete_exercise(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    principal.into_instructor()?;
    let id = state.service.delete_exercise(id.into()).await?;
    Ok(Json(serde_json::json!({ "deleted": *id })))
}
