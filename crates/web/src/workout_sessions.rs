use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use gymtrack_domain::{ExerciseLog, UpdateError, WorkoutSessionService};
use gymtrack_storage::document::{ExerciseLogDocument, WorkoutSessionDocument};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions/start", post(start_session))
        .route("/api/sessions/active", get(active_session))
        .route("/api/sessions/history", get(session_history))
        .route("/api/sessions", get(all_sessions))
        .route("/api/sessions/{id}", put(update_session))
        .route("/api/sessions/{id}/skip-exercise", post(skip_exercise))
        .route("/api/sessions/{id}/complete", post(complete_session))
        .route("/api/sessions/{id}/cancel", post(cancel_session))
        .route("/api/instructor/sessions", get(instructor_sessions))
}

/// Session-state failures surface as 400 so clients can distinguish them
/// from a missing session.
fn session_error(err: UpdateError) -> ApiError {
    match err {
        UpdateError::Conflict => {
            ApiError::BadRequest(String::from("session is not in progress"))
        }
        other => ApiError::from(other),
    }
}

fn exercises_from_documents(documents: Vec<ExerciseLogDocument>) -> ApiResult<Vec<ExerciseLog>> {
    documents
        .into_iter()
        .map(|d| ExerciseLog::try_from(d).map_err(ApiError::from))
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartSessionRequest {
    workout_plan_id: Uuid,
    division_index: usize,
}

#[derive(Serialize)]
struct SessionResponse {
    message: String,
    session: WorkoutSessionDocument,
}

async fn start_session(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<StartSessionRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let student = principal.into_student()?;
    let session = state
        .service
        .start_session(
            student.id,
            request.workout_plan_id.into(),
            request.division_index,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: String::from("workout session started"),
            session: WorkoutSessionDocument::from(&session),
        }),
    ))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActiveSessionResponse {
    has_active: bool,
    session: Option<WorkoutSessionDocument>,
}

async fn active_session(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<ActiveSessionResponse>> {
    let student = principal.into_student()?;
    let session = state.service.active_session(student.id).await?;
    Ok(Json(ActiveSessionResponse {
        has_active: session.is_some(),
        session: session.as_ref().map(WorkoutSessionDocument::from),
    }))
}

#[derive(Deserialize)]
struct UpdateSessionRequest {
    #[serde(default)]
    exercises: Option<Vec<ExerciseLogDocument>>,
    #[serde(default)]
    notes: Option<String>,
}

async fn update_session(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSessionRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let student = principal.into_student()?;
    let exercises = request.exercises.map(exercises_from_documents).transpose()?;
    let session = state
        .service
        .update_session(student.id, id.into(), exercises, request.notes)
        .await
        .map_err(session_error)?;
    Ok(Json(SessionResponse {
        message: String::from("progress saved"),
        session: WorkoutSessionDocument::from(&session),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkipExerciseRequest {
    exercise_index: usize,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Serialize)]
struct SkipExerciseResponse {
    message: String,
    exercise: ExerciseLogDocument,
}

async fn skip_exercise(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<SkipExerciseRequest>,
) -> ApiResult<Json<SkipExerciseResponse>> {
    let student = principal.into_student()?;
    let session = state
        .service
        .skip_exercise(student.id, id.into(), request.exercise_index, request.reason)
        .await
        .map_err(session_error)?;
    let exercise = session
        .exercises
        .get(request.exercise_index)
        .map(ExerciseLogDocument::from)
        .ok_or_else(|| ApiError::Internal(String::from("skipped exercise vanished")))?;
    Ok(Json(SkipExerciseResponse {
        message: String::from("exercise skipped"),
        exercise,
    }))
}

#[derive(Deserialize)]
struct CompleteSessionRequest {
    exercises: Vec<ExerciseLogDocument>,
    #[serde(default)]
    notes: Option<String>,
}

async fn complete_session(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteSessionRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let student = principal.into_student()?;
    let exercises = exercises_from_documents(request.exercises)?;
    let session = state
        .service
        .complete_session(student.id, id.into(), exercises, request.notes)
        .await
        .map_err(session_error)?;
    Ok(Json(SessionResponse {
        message: String::from("workout session completed"),
        session: WorkoutSessionDocument::from(&session),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelSessionResponse {
    message: String,
    session_id: Uuid,
}

async fn cancel_session(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CancelSessionResponse>> {
    let student = principal.into_student()?;
    let session_id = state
        .service
        .cancel_session(student.id, id.into())
        .await
        .map_err(session_error)?;
    Ok(Json(CancelSessionResponse {
        message: String::from("workout session cancelled and removed"),
        session_id: *session_id,
    }))
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

#[derive(Serialize)]
struct PaginationResponse {
    page: usize,
    limit: usize,
    total: u64,
    pages: u64,
}

#[derive(Serialize)]
struct HistoryResponse {
    sessions: Vec<WorkoutSessionDocument>,
    pagination: PaginationResponse,
}

async fn session_history(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let student = principal.into_student()?;
    let page = state
        .service
        .session_history(student.id, query.page, query.limit)
        .await?;
    Ok(Json(HistoryResponse {
        sessions: page.sessions.iter().map(WorkoutSessionDocument::from).collect(),
        pagination: PaginationResponse {
            page: page.page,
            limit: page.per_page,
            total: page.total,
            pages: page.pages,
        },
    }))
}

#[derive(Serialize)]
struct SessionListResponse {
    total: usize,
    sessions: Vec<WorkoutSessionDocument>,
}

async fn all_sessions(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<SessionListResponse>> {
    let student = principal.into_student()?;
    let sessions = state.service.student_sessions(student.id).await?;
    Ok(Json(SessionListResponse {
        total: sessions.len(),
        sessions: sessions.iter().map(WorkoutSessionDocument::from).collect(),
    }))
}

async fn instructor_sessions(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<SessionListResponse>> {
    let instructor = principal.into_instructor()?;
    let sessions = state.service.instructor_sessions(instructor.id).await?;
    Ok(Json(SessionListResponse {
        total: sessions.len(),
        sessions: sessions.iter().map(WorkoutSessionDocument::from).collect(),
    }))
}
