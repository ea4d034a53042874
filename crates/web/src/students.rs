use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use gymtrack_domain::{ProgressEntry, Student, StudentService, Weight, WorkoutPlanService};
use gymtrack_storage::document::{
    GoalDocument, HealthRestrictionsDocument, MeasurementsDocument, PersonalInfoDocument,
    StudentDocument, WorkoutPlanDocument,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/students", post(create_student).get(list_students))
        .route(
            "/api/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/api/students/{id}/progress", post(add_progress))
        .route("/api/students/{id}/goals/{index}", put(update_goal))
        .route(
            "/api/students/{id}/assign-workout-plan",
            put(assign_workout_plan),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateStudentRequest {
    user_id: Uuid,
    #[serde(default)]
    instructor_id: Option<Uuid>,
    #[serde(default)]
    personal_info: Option<PersonalInfoDocument>,
    #[serde(default)]
    health_restrictions: Option<HealthRestrictionsDocument>,
    #[serde(default)]
    goals: Option<Vec<GoalDocument>>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStudentRequest {
    #[serde(default)]
    instructor_id: Option<Uuid>,
    #[serde(default)]
    personal_info: Option<PersonalInfoDocument>,
    #[serde(default)]
    health_restrictions: Option<HealthRestrictionsDocument>,
    #[serde(default)]
    goals: Option<Vec<GoalDocument>>,
    #[serde(default)]
    status: Option<String>,
}

async fn create_student(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateStudentRequest>,
) -> ApiResult<(StatusCode, Json<StudentDocument>)> {
    principal.into_instructor()?;

    let document = StudentDocument {
        id: Uuid::nil(),
        user_id: request.user_id,
        instructor_id: request.instructor_id,
        current_workout_plan_id: None,
        workout_plan_id: None,
        workout_plans: vec![],
        personal_info: request.personal_info.unwrap_or_default(),
        health_restrictions: request.health_restrictions.unwrap_or_default(),
        goals: request.goals.unwrap_or_default(),
        progress_history: vec![],
        status: request.status.unwrap_or_else(|| String::from("active")),
    };
    let student = Student::try_from(document)?;

    let student = state.service.create_student(student).await?;
    Ok((StatusCode::CREATED, Json(StudentDocument::from(&student))))
}

async fn list_students(
    State(state): State<AppState>,
    _principal: Principal,
) -> ApiResult<Json<Vec<StudentDocument>>> {
    let students = state.service.get_students().await?;
    Ok(Json(students.iter().map(StudentDocument::from).collect()))
}

async fn get_student(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StudentDocument>> {
    let student = state.service.get_student(id.into()).await?;
    Ok(Json(StudentDocument::from(&student)))
}

async fn update_student(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStudentRequest>,
) -> ApiResult<Json<StudentDocument>> {
    principal.into_instructor()?;

    let student = state.service.get_student(id.into()).await?;
    let mut document = StudentDocument::from(&student);
    if let Some(instructor_id) = request.instructor_id {
        document.instructor_id = Some(instructor_id);
    }
    if let Some(personal_info) = request.personal_info {
        document.personal_info = personal_info;
    }
    if let Some(health_restrictions) = request.health_restrictions {
        document.health_restrictions = health_restrictions;
    }
    if let Some(goals) = request.goals {
        document.goals = goals;
    }
    if let Some(status) = request.status {
        document.status = status;
    }
    let student = Student::try_from(document)?;

    let student = state.service.update_student(student).await?;
    Ok(Json(StudentDocument::from(&student)))
}

async fn delete_student(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    principal.into_instructor()?;
    let id = state.service.delete_student(id.into()).await?;
    Ok(Json(serde_json::json!({ "deleted": *id })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRequest {
    weight: f32,
    measurements: MeasurementsDocument,
    #[serde(default)]
    body_fat_percentage: Option<f32>,
    #[serde(default)]
    notes: Option<String>,
}

async fn add_progress(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<ProgressRequest>,
) -> ApiResult<Json<StudentDocument>> {
    let entry = ProgressEntry {
        date: Utc::now(),
        weight: Weight::new(request.weight)
            .map_err(|err| ApiError::BadRequest(err.to_string()))?,
        measurements: request.measurements.into(),
        body_fat_percentage: request.body_fat_percentage,
        notes: request.notes,
    };

    let student = state.service.add_progress_entry(id.into(), entry).await?;
    Ok(Json(StudentDocument::from(&student)))
}

#[derive(Deserialize)]
struct UpdateGoalRequest {
    achieved: bool,
}

async fn update_goal(
    State(state): State<AppState>,
    _principal: Principal,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(request): Json<UpdateGoalRequest>,
) -> ApiResult<Json<StudentDocument>> {
    let student = state
        .service
        .set_goal_achieved(id.into(), index, request.achieved)
        .await?;
    Ok(Json(StudentDocument::from(&student)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignPlanRequest {
    workout_plan_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignPlanResponse {
    message: String,
    student: StudentDocument,
    workout_plan: WorkoutPlanDocument,
}

async fn assign_workout_plan(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignPlanRequest>,
) -> ApiResult<Json<AssignPlanResponse>> {
    let (student, plan) = state
        .service
        .assign_plan_to_student(request.workout_plan_id.into(), id.into())
        .await?;
    Ok(Json(AssignPlanResponse {
        message: String::from("workout plan assigned"),
        student: StudentDocument::from(&student),
        workout_plan: WorkoutPlanDocument::from(&plan),
    }))
}
