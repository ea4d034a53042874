//! Stored document shapes. Field names match the JSON documents of the
//! collections (camelCase, `_id` keys), so snapshots stay readable by the
//! tooling that grew around the original database.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use gymtrack_domain as domain;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    Name(#[from] domain::NameError),
    #[error(transparent)]
    Email(#[from] domain::EmailError),
    #[error(transparent)]
    Cpf(#[from] domain::CpfError),
    #[error("unknown {field} value `{value}`")]
    UnknownValue { field: &'static str, value: String },
}

impl From<DocumentError> for domain::StorageError {
    fn from(value: DocumentError) -> Self {
        domain::StorageError::Other(value.into())
    }
}

impl From<DocumentError> for domain::ReadError {
    fn from(value: DocumentError) -> Self {
        domain::ReadError::Storage(value.into())
    }
}

impl From<DocumentError> for domain::CreateError {
    fn from(value: DocumentError) -> Self {
        domain::CreateError::Storage(value.into())
    }
}

impl From<DocumentError> for domain::UpdateError {
    fn from(value: DocumentError) -> Self {
        domain::UpdateError::Storage(value.into())
    }
}

impl From<DocumentError> for domain::DeleteError {
    fn from(value: DocumentError) -> Self {
        domain::DeleteError::Storage(value.into())
    }
}

fn unknown(field: &'static str, value: &str) -> DocumentError {
    DocumentError::UnknownValue {
        field,
        value: value.to_string(),
    }
}

fn parse_role(value: &str) -> Result<domain::Role, DocumentError> {
    match value {
        "student" => Ok(domain::Role::Student),
        "instructor" => Ok(domain::Role::Instructor),
        _ => Err(unknown("role", value)),
    }
}

fn parse_student_status(value: &str) -> Result<domain::StudentStatus, DocumentError> {
    match value {
        "active" => Ok(domain::StudentStatus::Active),
        "paused" => Ok(domain::StudentStatus::Paused),
        "inactive" => Ok(domain::StudentStatus::Inactive),
        _ => Err(unknown("status", value)),
    }
}

fn parse_experience(value: &str) -> Result<domain::TrainingExperience, DocumentError> {
    match value {
        "beginner" => Ok(domain::TrainingExperience::Beginner),
        "intermediate" => Ok(domain::TrainingExperience::Intermediate),
        "advanced" => Ok(domain::TrainingExperience::Advanced),
        "athlete" => Ok(domain::TrainingExperience::Athlete),
        _ => Err(unknown("trainingExperience", value)),
    }
}

fn parse_condition(value: &str) -> Result<domain::EquipmentCondition, DocumentError> {
    match value {
        "excellent" => Ok(domain::EquipmentCondition::Excellent),
        "good" => Ok(domain::EquipmentCondition::Good),
        "needs repair" => Ok(domain::EquipmentCondition::NeedsRepair),
        _ => Err(unknown("condition", value)),
    }
}

fn parse_equipment_category(value: &str) -> Result<domain::EquipmentCategory, DocumentError> {
    match value {
        "cardio" => Ok(domain::EquipmentCategory::Cardio),
        "strength" => Ok(domain::EquipmentCategory::Strength),
        "functional" => Ok(domain::EquipmentCategory::Functional),
        "crossfit" => Ok(domain::EquipmentCategory::Crossfit),
        "free weights" => Ok(domain::EquipmentCategory::FreeWeights),
        "other" => Ok(domain::EquipmentCategory::Other),
        _ => Err(unknown("category", value)),
    }
}

fn parse_exercise_category(value: &str) -> Result<domain::ExerciseCategory, DocumentError> {
    match value {
        "strength" => Ok(domain::ExerciseCategory::Strength),
        "cardio" => Ok(domain::ExerciseCategory::Cardio),
        "flexibility" => Ok(domain::ExerciseCategory::Flexibility),
        "endurance" => Ok(domain::ExerciseCategory::Endurance),
        "power" => Ok(domain::ExerciseCategory::Power),
        "other" => Ok(domain::ExerciseCategory::Other),
        _ => Err(unknown("category", value)),
    }
}

fn parse_experience_level(value: &str) -> Result<domain::ExperienceLevel, DocumentError> {
    match value {
        "beginner" => Ok(domain::ExperienceLevel::Beginner),
        "intermediate" => Ok(domain::ExperienceLevel::Intermediate),
        "advanced" => Ok(domain::ExperienceLevel::Advanced),
        _ => Err(unknown("difficulty", value)),
    }
}

fn parse_muscle_group(value: &str) -> Result<domain::MuscleGroup, DocumentError> {
    domain::MuscleGroup::iter()
        .find(|m| m.to_string() == value)
        .copied()
        .ok_or_else(|| unknown("muscleGroups", value))
}

fn parse_muscle_groups(values: &[String]) -> Result<Vec<domain::MuscleGroup>, DocumentError> {
    values.iter().map(|v| parse_muscle_group(v)).collect()
}

fn parse_session_status(value: &str) -> Result<domain::SessionStatus, DocumentError> {
    match value {
        "in-progress" => Ok(domain::SessionStatus::InProgress),
        "completed" => Ok(domain::SessionStatus::Completed),
        _ => Err(unknown("status", value)),
    }
}

fn parse_perceived_difficulty(value: &str) -> Result<domain::PerceivedDifficulty, DocumentError> {
    match value {
        "easy" => Ok(domain::PerceivedDifficulty::Easy),
        "medium" => Ok(domain::PerceivedDifficulty::Medium),
        "hard" => Ok(domain::PerceivedDifficulty::Hard),
        _ => Err(unknown("difficulty", value)),
    }
}

fn parse_mood(value: &str) -> Result<domain::Mood, DocumentError> {
    match value {
        "great" => Ok(domain::Mood::Great),
        "good" => Ok(domain::Mood::Good),
        "normal" => Ok(domain::Mood::Normal),
        "tired" => Ok(domain::Mood::Tired),
        "bad" => Ok(domain::Mood::Bad),
        _ => Err(unknown("mood", value)),
    }
}

fn parse_weekday(value: &str) -> Result<Weekday, DocumentError> {
    value
        .parse::<Weekday>()
        .map_err(|_| unknown("workingDays", value))
}

fn parse_weekdays(values: &[String]) -> Result<Vec<Weekday>, DocumentError> {
    values.iter().map(|v| parse_weekday(v)).collect()
}

fn weekday_strings(values: &[Weekday]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn muscle_group_strings(values: &[domain::MuscleGroup]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn reps(value: u32) -> domain::Reps {
    domain::Reps::new(value).unwrap_or_default()
}

fn set_count(value: u32) -> domain::SetCount {
    domain::SetCount::new(value).unwrap_or_default()
}

fn weight(value: f32) -> domain::Weight {
    domain::Weight::new(value).unwrap_or_default()
}

fn seconds(value: u32) -> domain::Seconds {
    domain::Seconds::new(value).unwrap_or_default()
}

fn default_sets() -> u32 {
    3
}

fn default_reps() -> u32 {
    10
}

fn default_rest_time() -> u32 {
    60
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub password_hash: String,
    pub role: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<&domain::User> for UserDocument {
    fn from(value: &domain::User) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            email: value.email.to_string(),
            cpf: value.cpf.to_string(),
            phone: value.phone.clone(),
            birth_date: value.birth_date,
            password_hash: value.password_hash.clone(),
            role: value.role.to_string(),
            avatar: value.avatar.clone(),
        }
    }
}

impl TryFrom<UserDocument> for domain::User {
    type Error = DocumentError;

    fn try_from(value: UserDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            email: domain::Email::new(&value.email)?,
            cpf: domain::Cpf::new(&value.cpf)?,
            phone: value.phone,
            birth_date: value.birth_date,
            password_hash: value.password_hash,
            role: parse_role(&value.role)?,
            avatar: value.avatar,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDocument {
    pub working_days: Vec<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstructorDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cref: Option<String>,
    pub years_of_experience: u32,
    pub bio: String,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub availability: AvailabilityDocument,
    pub max_students: u32,
    #[serde(default)]
    pub students: Vec<Uuid>,
    #[serde(default)]
    pub gym_id: Option<Uuid>,
    pub is_active: bool,
}

impl From<&domain::Instructor> for InstructorDocument {
    fn from(value: &domain::Instructor) -> Self {
        Self {
            id: *value.id,
            user_id: *value.user_id,
            name: value.name.to_string(),
            email: value.email.to_string(),
            phone: value.phone.clone(),
            cref: value.cref.clone(),
            years_of_experience: value.years_of_experience,
            bio: value.bio.clone(),
            certifications: value.certifications.clone(),
            specialties: value.specialties.clone(),
            availability: AvailabilityDocument {
                working_days: weekday_strings(&value.availability.working_days),
                start_time: value.availability.start_time,
                end_time: value.availability.end_time,
            },
            max_students: value.max_students,
            students: value.students.iter().map(|id| **id).collect(),
            gym_id: value.gym_id.map(|id| *id),
            is_active: value.active,
        }
    }
}

impl TryFrom<InstructorDocument> for domain::Instructor {
    type Error = DocumentError;

    fn try_from(value: InstructorDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            user_id: value.user_id.into(),
            name: domain::Name::new(&value.name)?,
            email: domain::Email::new(&value.email)?,
            phone: value.phone,
            cref: value.cref,
            years_of_experience: value.years_of_experience,
            bio: value.bio,
            certifications: value.certifications,
            specialties: value.specialties,
            availability: domain::Availability {
                working_days: parse_weekdays(&value.availability.working_days)?,
                start_time: value.availability.start_time,
                end_time: value.availability.end_time,
            },
            max_students: value.max_students,
            students: value
                .students
                .into_iter()
                .map(domain::StudentID::from)
                .collect(),
            gym_id: value.gym_id.map(domain::GymID::from),
            active: value.is_active,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoDocument {
    #[serde(default)]
    pub current_weight: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub training_experience: Option<String>,
    #[serde(default)]
    pub training_days: Vec<String>,
    #[serde(default)]
    pub preferred_times: Vec<NaiveTime>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthRestrictionsDocument {
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub medical_authorization: bool,
    #[serde(default)]
    pub doctor_contact: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalDocument {
    pub description: String,
    #[serde(default)]
    pub target_value: Option<f32>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub achieved: bool,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementsDocument {
    #[serde(default)]
    pub chest: Option<f32>,
    #[serde(default)]
    pub waist: Option<f32>,
    #[serde(default)]
    pub abdomen: Option<f32>,
    #[serde(default)]
    pub hips: Option<f32>,
    #[serde(default)]
    pub right_arm: Option<f32>,
    #[serde(default)]
    pub left_arm: Option<f32>,
    #[serde(default)]
    pub right_thigh: Option<f32>,
    #[serde(default)]
    pub left_thigh: Option<f32>,
    #[serde(default)]
    pub right_calf: Option<f32>,
    #[serde(default)]
    pub left_calf: Option<f32>,
}

impl From<&domain::Measurements> for MeasurementsDocument {
    fn from(value: &domain::Measurements) -> Self {
        Self {
            chest: value.chest,
            waist: value.waist,
            abdomen: value.abdomen,
            hips: value.hips,
            right_arm: value.right_arm,
            left_arm: value.left_arm,
            right_thigh: value.right_thigh,
            left_thigh: value.left_thigh,
            right_calf: value.right_calf,
            left_calf: value.left_calf,
        }
    }
}

impl From<MeasurementsDocument> for domain::Measurements {
    fn from(value: MeasurementsDocument) -> Self {
        Self {
            chest: value.chest,
            waist: value.waist,
            abdomen: value.abdomen,
            hips: value.hips,
            right_arm: value.right_arm,
            left_arm: value.left_arm,
            right_thigh: value.right_thigh,
            left_thigh: value.left_thigh,
            right_calf: value.right_calf,
            left_calf: value.left_calf,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntryDocument {
    pub date: DateTime<Utc>,
    pub weight: f32,
    #[serde(default)]
    pub measurements: MeasurementsDocument,
    #[serde(default)]
    pub body_fat_percentage: Option<f32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&domain::ProgressEntry> for ProgressEntryDocument {
    fn from(value: &domain::ProgressEntry) -> Self {
        Self {
            date: value.date,
            weight: f32::from(value.weight),
            measurements: MeasurementsDocument::from(&value.measurements),
            body_fat_percentage: value.body_fat_percentage,
            notes: value.notes.clone(),
        }
    }
}

impl From<ProgressEntryDocument> for domain::ProgressEntry {
    fn from(value: ProgressEntryDocument) -> Self {
        Self {
            date: value.date,
            weight: weight(value.weight),
            measurements: value.measurements.into(),
            body_fat_percentage: value.body_fat_percentage,
            notes: value.notes,
        }
    }
}

/// The legacy `workoutPlanId` pointer is emitted as a mirror of
/// `currentWorkoutPlanId` and is only consulted on documents that predate the
/// current field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub instructor_id: Option<Uuid>,
    #[serde(default)]
    pub current_workout_plan_id: Option<Uuid>,
    #[serde(default)]
    pub workout_plan_id: Option<Uuid>,
    #[serde(default)]
    pub workout_plans: Vec<Uuid>,
    #[serde(default)]
    pub personal_info: PersonalInfoDocument,
    #[serde(default)]
    pub health_restrictions: HealthRestrictionsDocument,
    #[serde(default)]
    pub goals: Vec<GoalDocument>,
    #[serde(default)]
    pub progress_history: Vec<ProgressEntryDocument>,
    pub status: String,
}

impl From<&domain::Student> for StudentDocument {
    fn from(value: &domain::Student) -> Self {
        Self {
            id: *value.id,
            user_id: *value.user_id,
            instructor_id: value.instructor_id.map(|id| *id),
            current_workout_plan_id: value.current_plan_id.map(|id| *id),
            workout_plan_id: value.current_plan_id.map(|id| *id),
            workout_plans: value.workout_plans.iter().map(|id| **id).collect(),
            personal_info: PersonalInfoDocument {
                current_weight: value.personal_info.current_weight.map(f32::from),
                height: value.personal_info.height,
                training_experience: value
                    .personal_info
                    .experience
                    .map(|e| experience_string(e)),
                training_days: weekday_strings(&value.personal_info.training_days),
                preferred_times: value.personal_info.preferred_times.clone(),
            },
            health_restrictions: HealthRestrictionsDocument {
                chronic_conditions: value.health.chronic_conditions.clone(),
                medications: value.health.medications.clone(),
                medical_authorization: value.health.medical_authorization,
                doctor_contact: value.health.doctor_contact.clone(),
                notes: value.health.notes.clone(),
            },
            goals: value
                .goals
                .iter()
                .map(|g| GoalDocument {
                    description: g.description.clone(),
                    target_value: g.target_value,
                    target_date: g.target_date,
                    achieved: g.achieved,
                })
                .collect(),
            progress_history: value
                .progress_history
                .iter()
                .map(ProgressEntryDocument::from)
                .collect(),
            status: value.status.to_string(),
        }
    }
}

fn experience_string(value: domain::TrainingExperience) -> String {
    match value {
        domain::TrainingExperience::Beginner => "beginner",
        domain::TrainingExperience::Intermediate => "intermediate",
        domain::TrainingExperience::Advanced => "advanced",
        domain::TrainingExperience::Athlete => "athlete",
    }
    .to_string()
}

impl TryFrom<StudentDocument> for domain::Student {
    type Error = DocumentError;

    fn try_from(value: StudentDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            user_id: value.user_id.into(),
            instructor_id: value.instructor_id.map(domain::InstructorID::from),
            current_plan_id: value
                .current_workout_plan_id
                .or(value.workout_plan_id)
                .map(domain::WorkoutPlanID::from),
            workout_plans: value
                .workout_plans
                .into_iter()
                .map(domain::WorkoutPlanID::from)
                .collect(),
            personal_info: domain::PersonalInfo {
                current_weight: value.personal_info.current_weight.map(weight),
                height: value.personal_info.height,
                experience: value
                    .personal_info
                    .training_experience
                    .as_deref()
                    .map(parse_experience)
                    .transpose()?,
                training_days: parse_weekdays(&value.personal_info.training_days)?,
                preferred_times: value.personal_info.preferred_times,
            },
            health: domain::HealthRestrictions {
                chronic_conditions: value.health_restrictions.chronic_conditions,
                medications: value.health_restrictions.medications,
                medical_authorization: value.health_restrictions.medical_authorization,
                doctor_contact: value.health_restrictions.doctor_contact,
                notes: value.health_restrictions.notes,
            },
            goals: value
                .goals
                .into_iter()
                .map(|g| domain::Goal {
                    description: g.description,
                    target_value: g.target_value,
                    target_date: g.target_date,
                    achieved: g.achieved,
                })
                .collect(),
            progress_history: value
                .progress_history
                .into_iter()
                .map(domain::ProgressEntry::from)
                .collect(),
            status: parse_student_status(&value.status)?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocationDocument {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GymEquipmentDocument {
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    pub condition: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GymDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub location: LocationDocument,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub equipments: Vec<GymEquipmentDocument>,
    #[serde(default)]
    pub instructors: Vec<Uuid>,
    #[serde(default)]
    pub students: Vec<Uuid>,
}

impl From<&domain::Gym> for GymDocument {
    fn from(value: &domain::Gym) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            description: value.description.clone(),
            image: value.image.clone(),
            location: LocationDocument {
                address: value.location.address.clone(),
                city: value.location.city.clone(),
                state: value.location.state.clone(),
                zip_code: value.location.zip_code.clone(),
            },
            phone: value.phone.clone(),
            email: value.email.as_ref().map(ToString::to_string),
            equipments: value
                .equipment
                .iter()
                .map(|e| GymEquipmentDocument {
                    name: e.name.to_string(),
                    quantity: e.quantity,
                    condition: e.condition.to_string(),
                    notes: e.notes.clone(),
                })
                .collect(),
            instructors: value.instructors.iter().map(|id| **id).collect(),
            students: value.students.iter().map(|id| **id).collect(),
        }
    }
}

impl TryFrom<GymDocument> for domain::Gym {
    type Error = DocumentError;

    fn try_from(value: GymDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            description: value.description,
            image: value.image,
            location: domain::Location {
                address: value.location.address,
                city: value.location.city,
                state: value.location.state,
                zip_code: value.location.zip_code,
            },
            phone: value.phone,
            email: value
                .email
                .as_deref()
                .map(domain::Email::new)
                .transpose()?,
            equipment: value
                .equipments
                .into_iter()
                .map(|e| {
                    Ok(domain::GymEquipment {
                        name: domain::Name::new(&e.name)?,
                        quantity: e.quantity,
                        condition: parse_condition(&e.condition)?,
                        notes: e.notes,
                    })
                })
                .collect::<Result<Vec<_>, DocumentError>>()?,
            instructors: value
                .instructors
                .into_iter()
                .map(domain::InstructorID::from)
                .collect(),
            students: value
                .students
                .into_iter()
                .map(domain::StudentID::from)
                .collect(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub instructor_id: Uuid,
    #[serde(default)]
    pub gym_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub is_available: bool,
    pub difficulty: String,
    #[serde(default)]
    pub safety_tips: Vec<String>,
    #[serde(default)]
    pub usage_count: u32,
}

impl From<&domain::Equipment> for EquipmentDocument {
    fn from(value: &domain::Equipment) -> Self {
        Self {
            id: *value.id,
            instructor_id: *value.instructor_id,
            gym_id: value.gym_id.map(|id| *id),
            name: value.name.to_string(),
            description: value.description.clone(),
            category: value.category.to_string(),
            muscle_groups: muscle_group_strings(&value.muscle_groups),
            image: value.image.clone(),
            is_available: value.available,
            difficulty: value.difficulty.to_string(),
            safety_tips: value.safety_tips.clone(),
            usage_count: value.usage_count,
        }
    }
}

impl TryFrom<EquipmentDocument> for domain::Equipment {
    type Error = DocumentError;

    fn try_from(value: EquipmentDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            instructor_id: value.instructor_id.into(),
            gym_id: value.gym_id.map(domain::GymID::from),
            name: domain::Name::new(&value.name)?,
            description: value.description,
            category: parse_equipment_category(&value.category)?,
            muscle_groups: parse_muscle_groups(&value.muscle_groups)?,
            image: value.image,
            available: value.is_available,
            difficulty: parse_experience_level(&value.difficulty)?,
            safety_tips: value.safety_tips,
            usage_count: value.usage_count,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub how_to_perform: String,
    pub category: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default)]
    pub equipment_id: Option<Uuid>,
    #[serde(default)]
    pub image: Option<String>,
    pub difficulty: String,
    #[serde(default)]
    pub safety_tips: Option<String>,
    #[serde(default)]
    pub variations: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub usage_count: u32,
}

impl From<&domain::Exercise> for ExerciseDocument {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: *value.id,
            instructor_id: *value.instructor_id,
            name: value.name.to_string(),
            description: value.description.clone(),
            how_to_perform: value.how_to_perform.clone(),
            category: value.category.to_string(),
            muscle_groups: muscle_group_strings(&value.muscle_groups),
            equipment_id: value.equipment_id.map(|id| *id),
            image: value.image.clone(),
            difficulty: value.difficulty.to_string(),
            safety_tips: value.safety_tips.clone(),
            variations: value.variations.clone(),
            video_url: value.video_url.clone(),
            is_active: value.active,
            usage_count: value.usage_count,
        }
    }
}

impl TryFrom<ExerciseDocument> for domain::Exercise {
    type Error = DocumentError;

    fn try_from(value: ExerciseDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            instructor_id: value.instructor_id.into(),
            name: domain::Name::new(&value.name)?,
            description: value.description,
            how_to_perform: value.how_to_perform,
            category: parse_exercise_category(&value.category)?,
            muscle_groups: parse_muscle_groups(&value.muscle_groups)?,
            equipment_id: value.equipment_id.map(domain::EquipmentID::from),
            image: value.image,
            difficulty: parse_experience_level(&value.difficulty)?,
            safety_tips: value.safety_tips,
            variations: value.variations,
            video_url: value.video_url,
            active: value.is_active,
            usage_count: value.usage_count,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanExerciseDocument {
    #[serde(default)]
    pub exercise_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_sets")]
    pub sets: u32,
    #[serde(default = "default_reps")]
    pub reps: u32,
    #[serde(default)]
    pub ideal_weight: f32,
    #[serde(default = "default_rest_time")]
    pub rest_time: u32,
    #[serde(default)]
    pub to_failure: bool,
    #[serde(default)]
    pub equipment_id: Option<Uuid>,
}

impl From<&domain::PlanExercise> for PlanExerciseDocument {
    fn from(value: &domain::PlanExercise) -> Self {
        Self {
            exercise_id: value.exercise_id.map(|id| *id),
            name: value.name.to_string(),
            description: value.description.clone(),
            sets: u32::from(value.sets),
            reps: u32::from(value.reps),
            ideal_weight: f32::from(value.ideal_weight),
            rest_time: u32::from(value.rest_time),
            to_failure: value.to_failure,
            equipment_id: value.equipment_id.map(|id| *id),
        }
    }
}

impl TryFrom<PlanExerciseDocument> for domain::PlanExercise {
    type Error = DocumentError;

    fn try_from(value: PlanExerciseDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            exercise_id: value.exercise_id.map(domain::ExerciseID::from),
            name: domain::Name::new(&value.name)?,
            description: value.description,
            sets: set_count(value.sets),
            reps: reps(value.reps),
            ideal_weight: weight(value.ideal_weight),
            rest_time: seconds(value.rest_time),
            to_failure: value.to_failure,
            equipment_id: value.equipment_id.map(domain::EquipmentID::from),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DivisionDocument {
    pub name: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default)]
    pub exercises: Vec<PlanExerciseDocument>,
}

impl From<&domain::Division> for DivisionDocument {
    fn from(value: &domain::Division) -> Self {
        Self {
            name: value.name.to_string(),
            muscle_groups: muscle_group_strings(&value.muscle_groups),
            exercises: value
                .exercises
                .iter()
                .map(PlanExerciseDocument::from)
                .collect(),
        }
    }
}

impl TryFrom<DivisionDocument> for domain::Division {
    type Error = DocumentError;

    fn try_from(value: DivisionDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            name: domain::Name::new(&value.name)?,
            muscle_groups: parse_muscle_groups(&value.muscle_groups)?,
            exercises: value
                .exercises
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, DocumentError>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlanDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub divisions: Vec<DivisionDocument>,
    #[serde(default)]
    pub assigned_students: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&domain::WorkoutPlan> for WorkoutPlanDocument {
    fn from(value: &domain::WorkoutPlan) -> Self {
        Self {
            id: *value.id,
            instructor_id: *value.instructor_id,
            name: value.name.to_string(),
            description: value.description.clone(),
            goal: value.goal.clone(),
            divisions: value.divisions.iter().map(DivisionDocument::from).collect(),
            assigned_students: value.assigned_students.iter().map(|id| **id).collect(),
            created_at: value.created_at,
        }
    }
}

impl TryFrom<WorkoutPlanDocument> for domain::WorkoutPlan {
    type Error = DocumentError;

    fn try_from(value: WorkoutPlanDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            instructor_id: value.instructor_id.into(),
            name: domain::Name::new(&value.name)?,
            description: value.description,
            goal: value.goal,
            divisions: value
                .divisions
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, DocumentError>>()?,
            assigned_students: value
                .assigned_students
                .into_iter()
                .map(domain::StudentID::from)
                .collect(),
            created_at: value.created_at,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetLogDocument {
    pub set_number: u32,
    #[serde(default = "default_reps")]
    pub reps: u32,
    #[serde(default)]
    pub weight: f32,
    #[serde(default)]
    pub is_body_weight: bool,
    #[serde(default)]
    pub actual_reps: Option<u32>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rest_time_taken: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&domain::SetLog> for SetLogDocument {
    fn from(value: &domain::SetLog) -> Self {
        Self {
            set_number: value.set_number,
            reps: u32::from(value.reps),
            weight: f32::from(value.weight),
            is_body_weight: value.is_body_weight,
            actual_reps: value.actual_reps.map(u32::from),
            completed: value.completed,
            completed_at: value.completed_at,
            rest_time_taken: value.rest_time_taken.map(u32::from),
            difficulty: value.difficulty.map(|d| d.to_string()),
            notes: value.notes.clone(),
        }
    }
}

impl TryFrom<SetLogDocument> for domain::SetLog {
    type Error = DocumentError;

    fn try_from(value: SetLogDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            set_number: value.set_number,
            reps: reps(value.reps),
            weight: weight(value.weight),
            is_body_weight: value.is_body_weight,
            actual_reps: value.actual_reps.map(reps),
            completed: value.completed,
            completed_at: value.completed_at,
            rest_time_taken: value.rest_time_taken.map(seconds),
            difficulty: value
                .difficulty
                .as_deref()
                .map(parse_perceived_difficulty)
                .transpose()?,
            notes: value.notes,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLogDocument {
    #[serde(default)]
    pub exercise_id: Option<Uuid>,
    pub exercise_name: String,
    #[serde(default)]
    pub ideal_weight: f32,
    #[serde(default = "default_rest_time")]
    pub rest_time: u32,
    #[serde(default)]
    pub to_failure: bool,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default)]
    pub sets: Vec<SetLogDocument>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub skip_reason: Option<String>,
}

impl From<&domain::ExerciseLog> for ExerciseLogDocument {
    fn from(value: &domain::ExerciseLog) -> Self {
        Self {
            exercise_id: value.exercise_id.map(|id| *id),
            exercise_name: value.exercise_name.to_string(),
            ideal_weight: f32::from(value.ideal_weight),
            rest_time: u32::from(value.rest_time),
            to_failure: value.to_failure,
            muscle_groups: muscle_group_strings(&value.muscle_groups),
            sets: value.sets.iter().map(SetLogDocument::from).collect(),
            notes: value.notes.clone(),
            completed: value.completed,
            completed_at: value.completed_at,
            skipped: value.skipped,
            skip_reason: value.skip_reason.clone(),
        }
    }
}

impl TryFrom<ExerciseLogDocument> for domain::ExerciseLog {
    type Error = DocumentError;

    fn try_from(value: ExerciseLogDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            exercise_id: value.exercise_id.map(domain::ExerciseID::from),
            exercise_name: domain::Name::new(&value.exercise_name)?,
            ideal_weight: weight(value.ideal_weight),
            rest_time: seconds(value.rest_time),
            to_failure: value.to_failure,
            muscle_groups: parse_muscle_groups(&value.muscle_groups)?,
            sets: value
                .sets
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, DocumentError>>()?,
            notes: value.notes,
            completed: value.completed,
            completed_at: value.completed_at,
            skipped: value.skipped,
            skip_reason: value.skip_reason,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSessionDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub student_id: Uuid,
    pub instructor_id: Uuid,
    pub workout_plan_id: Uuid,
    pub workout_name: String,
    pub division_name: String,
    #[serde(default)]
    pub division_index: usize,
    #[serde(default)]
    pub exercises: Vec<ExerciseLogDocument>,
    pub status: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub total_exercises: u32,
    #[serde(default)]
    pub completed_exercises: u32,
    #[serde(default)]
    pub skipped_exercises: u32,
    #[serde(default)]
    pub total_sets: u32,
    #[serde(default)]
    pub completed_sets: u32,
    #[serde(default)]
    pub total_volume: f64,
    #[serde(default)]
    pub average_rest_time: Option<u32>,
    #[serde(default)]
    pub student_weight: Option<f32>,
    #[serde(default)]
    pub overall_difficulty: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub instructor_feedback: Option<String>,
}

impl From<&domain::WorkoutSession> for WorkoutSessionDocument {
    fn from(value: &domain::WorkoutSession) -> Self {
        Self {
            id: *value.id,
            student_id: *value.student_id,
            instructor_id: *value.instructor_id,
            workout_plan_id: *value.workout_plan_id,
            workout_name: value.workout_name.to_string(),
            division_name: value.division_name.to_string(),
            division_index: value.division_index,
            exercises: value
                .exercises
                .iter()
                .map(ExerciseLogDocument::from)
                .collect(),
            status: value.status.to_string(),
            start_time: value.start_time,
            end_time: value.end_time,
            duration: value.totals.duration,
            total_exercises: value.totals.total_exercises,
            completed_exercises: value.totals.completed_exercises,
            skipped_exercises: value.totals.skipped_exercises,
            total_sets: value.totals.total_sets,
            completed_sets: value.totals.completed_sets,
            total_volume: value.totals.total_volume,
            average_rest_time: value.totals.average_rest_time,
            student_weight: value.student_weight.map(f32::from),
            overall_difficulty: value.overall_difficulty.map(|d| d.to_string()),
            mood: value.mood.map(|m| m.to_string()),
            notes: value.notes.clone(),
            instructor_feedback: value.instructor_feedback.clone(),
        }
    }
}

impl TryFrom<WorkoutSessionDocument> for domain::WorkoutSession {
    type Error = DocumentError;

    fn try_from(value: WorkoutSessionDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            student_id: value.student_id.into(),
            instructor_id: value.instructor_id.into(),
            workout_plan_id: value.workout_plan_id.into(),
            workout_name: domain::Name::new(&value.workout_name)?,
            division_name: domain::Name::new(&value.division_name)?,
            division_index: value.division_index,
            exercises: value
                .exercises
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, DocumentError>>()?,
            status: parse_session_status(&value.status)?,
            start_time: value.start_time,
            end_time: value.end_time,
            student_weight: value.student_weight.map(weight),
            overall_difficulty: value
                .overall_difficulty
                .as_deref()
                .map(parse_perceived_difficulty)
                .transpose()?,
            mood: value.mood.as_deref().map(parse_mood).transpose()?,
            notes: value.notes,
            instructor_feedback: value.instructor_feedback,
            totals: domain::SessionTotals {
                duration: value.duration,
                total_exercises: value.total_exercises,
                completed_exercises: value.completed_exercises,
                skipped_exercises: value.skipped_exercises,
                total_sets: value.total_sets,
                completed_sets: value.completed_sets,
                total_volume: value.total_volume,
                average_rest_time: value.average_rest_time,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::tests::data;

    use super::*;

    #[rstest]
    #[case("in-progress", Ok(domain::SessionStatus::InProgress))]
    #[case("completed", Ok(domain::SessionStatus::Completed))]
    #[case("paused", Err(()))]
    fn test_parse_session_status(
        #[case] value: &str,
        #[case] expected: Result<domain::SessionStatus, ()>,
    ) {
        assert_eq!(parse_session_status(value).map_err(|_| ()), expected);
    }

    #[rstest]
    #[case("chest", Ok(domain::MuscleGroup::Chest))]
    #[case("full body", Ok(domain::MuscleGroup::FullBody))]
    #[case("neck", Err(()))]
    fn test_parse_muscle_group(
        #[case] value: &str,
        #[case] expected: Result<domain::MuscleGroup, ()>,
    ) {
        assert_eq!(parse_muscle_group(value).map_err(|_| ()), expected);
    }

    #[test]
    fn test_student_document_mirrors_legacy_pointer() {
        let mut student = data::student(1, 1);
        student.enroll(7.into());
        let value = serde_json::to_value(StudentDocument::from(&student)).unwrap();
        assert_eq!(value["currentWorkoutPlanId"], value["workoutPlanId"]);
        assert_eq!(
            value["currentWorkoutPlanId"],
            json!(domain::WorkoutPlanID::from(7).to_string())
        );
    }

    #[test]
    fn test_student_document_accepts_legacy_pointer_only() {
        let plan_id = Uuid::from_u128(7);
        let document: StudentDocument = serde_json::from_value(json!({
            "_id": Uuid::from_u128(1),
            "userId": Uuid::from_u128(2),
            "workoutPlanId": plan_id,
            "status": "active",
        }))
        .unwrap();
        let student = domain::Student::try_from(document).unwrap();
        assert_eq!(student.current_plan_id, Some(plan_id.into()));
    }

    #[test]
    fn test_plan_exercise_document_defaults() {
        let document: PlanExerciseDocument =
            serde_json::from_value(json!({ "name": "Push-up" })).unwrap();
        let exercise = domain::PlanExercise::try_from(document).unwrap();
        assert_eq!(u32::from(exercise.sets), 3);
        assert_eq!(u32::from(exercise.reps), 10);
        assert_eq!(u32::from(exercise.rest_time), 60);
        assert!(exercise.is_body_weight());
    }

    #[test]
    fn test_session_document_round_trip() {
        let session = data::completed_session(1, 1, 1, 1);
        let document = WorkoutSessionDocument::from(&session);
        assert_eq!(document.status, "completed");
        let restored = domain::WorkoutSession::try_from(document).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_session_document_rejects_unknown_status() {
        let session = data::completed_session(1, 1, 1, 1);
        let mut document = WorkoutSessionDocument::from(&session);
        document.status = String::from("cancelled");
        assert!(matches!(
            domain::WorkoutSession::try_from(document),
            Err(DocumentError::UnknownValue { field: "status", .. })
        ));
    }

    #[test]
    fn test_instructor_document_round_trip() {
        let instructor = data::instructor(1, 1, 10);
        let document = InstructorDocument::from(&instructor);
        let restored = domain::Instructor::try_from(document).unwrap();
        assert_eq!(restored, instructor);
    }
}
