use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use gymtrack_domain::{Instructor, InstructorService, UserService};
use gymtrack_storage::document::{AvailabilityDocument, InstructorDocument};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/instructors", post(create_instructor).get(list_instructors))
        .route(
            "/api/instructors/{id}",
            get(get_instructor).put(update_instructor),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateInstructorRequest {
    user_id: Uuid,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    cref: Option<String>,
    years_of_experience: u32,
    bio: String,
    certifications: Vec<String>,
    specialties: Vec<String>,
    availability: AvailabilityDocument,
    #[serde(default)]
    max_students: Option<u32>,
    #[serde(default)]
    gym_id: Option<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateInstructorRequest {
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    cref: Option<String>,
    #[serde(default)]
    years_of_experience: Option<u32>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    certifications: Option<Vec<String>>,
    #[serde(default)]
    specialties: Option<Vec<String>>,
    #[serde(default)]
    availability: Option<AvailabilityDocument>,
    #[serde(default)]
    max_students: Option<u32>,
    #[serde(default)]
    gym_id: Option<Uuid>,
    #[serde(default)]
    is_active: Option<bool>,
}

async fn create_instructor(
    State(state): State<AppState>,
    Json(request): Json<CreateInstructorRequest>,
) -> ApiResult<(StatusCode, Json<InstructorDocument>)> {
    // Contact data mirrors the account record.
    let user = state
        .service
        .get_user(request.user_id.into())
        .await
        .map_err(|_| ApiError::BadRequest(String::from("unknown user")))?;

    let document = InstructorDocument {
        id: Uuid::nil(),
        user_id: request.user_id,
        name: user.name.to_string(),
        email: user.email.to_string(),
        phone: request.phone,
        cref: request.cref,
        years_of_experience: request.years_of_experience,
        bio: request.bio,
        certifications: request.certifications,
        specialties: request.specialties,
        availability: request.availability,
        max_students: request.max_students.unwrap_or(20),
        students: vec![],
        gym_id: request.gym_id,
        is_active: true,
    };
    let instructor = Instructor::try_from(document)?;
    state.service.validate_instructor(&instructor)?;

    let instructor = state.service.create_instructor(instructor).await?;
    Ok((
        StatusCode::CREATED,
        Json(InstructorDocument::from(&instructor)),
    ))
}

async fn list_instructors(
    State(state): State<AppState>,
    _principal: Principal,
) -> ApiResult<Json<Vec<InstructorDocument>>> {
    let instructors = state.service.get_instructors().await?;
    Ok(Json(
        instructors.iter().map(InstructorDocument::from).collect(),
    ))
}

async fn get_instructor(
    State(state): State<AppState>,
    _principal: Principal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InstructorDocument>> {
    let instructor = state.service.get_instructor(id.into()).await?;
    Ok(Json(InstructorDocument::from(&instructor)))
}

async fn update_instructor(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInstructorRequest>,
) -> ApiResult<Json<InstructorDocument>> {
    principal.into_instructor()?;

    let instructor = state.service.get_instructor(id.into()).await?;
    let mut document = InstructorDocument::from(&instructor);
    if let Some(phone) = request.phone {
        document.phone = Some(phone);
    }
    if let Some(cref) = request.cref {
        document.cref = Some(cref);
    }
    if let Some(years_of_experience) = request.years_of_experience {
        document.years_of_experience = years_of_experience;
    }
    if let Some(bio) = request.bio {
        document.bio = bio;
    }
    if let Some(certifications) = request.certifications {
        document.certifications = certifications;
    }
    if let Some(specialties) = request.specialties {
        document.specialties = specialties;
    }
    if let Some(availability) = request.availability {
        document.availability = availability;
    }
    if let Some(max_students) = request.max_students {
        document.max_students = max_students;
    }
    if let Some(gym_id) = request.gym_id {
        document.gym_id = Some(gym_id);
    }
    if let Some(is_active) = request.is_active {
        document.is_active = is_active;
    }
    let instructor = Instructor::try_from(document)?;
    state.service.validate_instructor(&instructor)?;

    let instructor = state.service.update_instructor(instructor).await?;
    Ok(Json(InstructorDocument::from(&instructor)))
}
