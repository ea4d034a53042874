use std::collections::BTreeSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use gymtrack_domain::{Division, Name, WorkoutPlan, WorkoutPlanID, WorkoutPlanService};
use gymtrack_storage::document::{DivisionDocument, StudentDocument, WorkoutPlanDocument};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/workout-plans", post(create_plan).get(list_plans))
        .route(
            "/api/workout-plans/{id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .route("/api/workout-plans/{id}/students", get(plan_students))
        .route(
            "/api/workout-plans/{id}/students/{student_id}",
            delete(unassign_student),
        )
        .route("/api/my-workout-plans", get(my_plans))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePlanRequest {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    goal: Option<String>,
    divisions: Vec<DivisionDocument>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePlanRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    goal: Option<String>,
    #[serde(default)]
    divisions: Option<Vec<DivisionDocument>>,
    #[serde(default)]
    assigned_students: Option<Vec<Uuid>>,
}

fn divisions_from_documents(documents: Vec<DivisionDocument>) -> ApiResult<Vec<Division>> {
    documents
        .into_iter()
        .map(|d| Division::try_from(d).map_err(ApiError::from))
        .collect()
}

async fn create_plan(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreatePlanRequest>,
) -> ApiResult<(StatusCode, Json<WorkoutPlanDocument>)> {
    let instructor = principal.into_instructor()?;

    let plan = WorkoutPlan {
        id: WorkoutPlanID::nil(),
        instructor_id: instructor.id,
        name: Name::new(&request.name).map_err(|err| ApiError::BadRequest(err.to_string()))?,
        description: request.description,
        goal: request.goal,
        divisions: divisions_from_documents(request.divisions)?,
        assigned_students: BTreeSet::new(),
        created_at: Utc::now(),
    };

    let plan = state.service.create_workout_plan(plan).await?;
    Ok((StatusCode::CREATED, Json(WorkoutPlanDocument::from(&plan))))
}

async fn list_plans(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<WorkoutPlanDocument>>> {
    let instructor = principal.into_instructor()?;
    let plans = state.service.get_workout_plans(instructor.id).await?;
    Ok(Json(plans.iter().map(WorkoutPlanDocument::from).collect()))
}

async fn get_plan(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WorkoutPlanDocument>> {
    let plan = state.service.get_workout_plan(id.into()).await?;
    Ok(Json(WorkoutPlanDocument::from(&plan)))
}

async fn update_plan(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlanRequest>,
) -> ApiResult<Json<WorkoutPlanDocument>> {
    let instructor = principal.into_instructor()?;

    let name = request
        .name
        .as_deref()
        .map(Name::new)
        .transpose()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let divisions = request.divisions.map(divisions_from_documents).transpose()?;
    let assigned_students = request
        .assigned_students
        .map(|ids| ids.into_iter().map(Into::into).collect::<BTreeSet<_>>());

    let plan = state
        .service
        .update_workout_plan(
            instructor.id,
            id.into(),
            name,
            request.description,
            request.goal,
            divisions,
            assigned_students,
        )
        .await?;
    Ok(Json(WorkoutPlanDocument::from(&plan)))
}

async fn delete_plan(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let instructor = principal.into_instructor()?;
    let id = state
        .service
        .delete_workout_plan(instructor.id, id.into())
        .await?;
    Ok(Json(serde_json::json!({
        "message": "workout plan deleted",
        "deleted": *id,
    })))
}

async fn plan_students(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<StudentDocument>>> {
    let students = state.service.plan_students(id.into()).await?;
    Ok(Json(students.iter().map(StudentDocument::from).collect()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnassignResponse {
    message: String,
    student: StudentDocument,
    workout_plan: WorkoutPlanDocument,
}

async fn unassign_student(
    State(state): State<AppState>,
    _principal: Principal,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<UnassignResponse>> {
    let (student, plan) = state
        .service
        .unassign_plan_from_student(id.into(), student_id.into())
        .await?;
    Ok(Json(UnassignResponse {
        message: String::from("student unassigned from workout plan"),
        student: StudentDocument::from(&student),
        workout_plan: WorkoutPlanDocument::from(&plan),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanWithStatsResponse {
    #[serde(flatten)]
    plan: WorkoutPlanDocument,
    completed_sessions: u64,
    last_completed: Option<DateTime<Utc>>,
}

/// Student-facing listing of the plans the caller is enrolled in, with
/// completion statistics per plan.
async fn my_plans(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<PlanWithStatsResponse>>> {
    let student = principal.into_student()?;
    let plans = state.service.student_plans(student.id).await?;
    Ok(Json(
        plans
            .into_iter()
            .map(|p| PlanWithStatsResponse {
                plan: WorkoutPlanDocument::from(&p.plan),
                completed_sessions: p.completed_sessions,
                last_completed: p.last_completed,
            })
            .collect(),
    ))
}
