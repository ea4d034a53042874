use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, InstructorID, ReadError, UpdateError, UserID, Weight, WorkoutPlanID,
};

#[allow(async_fn_in_trait)]
pub trait StudentService {
    async fn get_students(&self) -> Result<Vec<Student>, ReadError>;
    async fn get_student(&self, id: StudentID) -> Result<Student, ReadError>;
    async fn student_by_user(&self, user_id: UserID) -> Result<Option<Student>, ReadError>;
    async fn create_student(&self, student: Student) -> Result<Student, CreateError>;
    async fn update_student(&self, student: Student) -> Result<Student, UpdateError>;
    async fn delete_student(&self, id: StudentID) -> Result<StudentID, DeleteError>;
    async fn add_progress_entry(
        &self,
        id: StudentID,
        entry: ProgressEntry,
    ) -> Result<Student, UpdateError>;
    async fn set_goal_achieved(
        &self,
        id: StudentID,
        goal_index: usize,
        achieved: bool,
    ) -> Result<Student, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait StudentRepository {
    async fn read_students(&self) -> Result<Vec<Student>, ReadError>;
    async fn read_student(&self, id: StudentID) -> Result<Student, ReadError>;
    async fn find_student_by_user(&self, user_id: UserID) -> Result<Option<Student>, ReadError>;
    async fn create_student(&self, student: Student) -> Result<Student, CreateError>;
    async fn replace_student(&self, student: Student) -> Result<Student, UpdateError>;
    async fn delete_student(&self, id: StudentID) -> Result<StudentID, DeleteError>;
    /// Removes the plan from every student that references it in a single
    /// multi-document update. Returns the number of modified students.
    async fn detach_plan_from_students(&self, plan_id: WorkoutPlanID) -> Result<u64, UpdateError>;
}

/// A trainee. Plan membership has a single source of truth: `current_plan_id`
/// plus the `workout_plans` set. The stored document's legacy `workoutPlanId`
/// field is emitted as an alias of `currentWorkoutPlanId`, never written
/// independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: StudentID,
    pub user_id: UserID,
    pub instructor_id: Option<InstructorID>,
    pub current_plan_id: Option<WorkoutPlanID>,
    pub workout_plans: BTreeSet<WorkoutPlanID>,
    pub personal_info: PersonalInfo,
    pub health: HealthRestrictions,
    pub goals: Vec<Goal>,
    pub progress_history: Vec<ProgressEntry>,
    pub status: StudentStatus,
}

impl Student {
    #[must_use]
    pub fn enrolled_in(&self, plan_id: WorkoutPlanID) -> bool {
        self.workout_plans.contains(&plan_id)
    }

    /// Adds the plan to the membership set and makes it the current plan.
    /// Inserting an already present plan is a no-op on the set.
    pub fn enroll(&mut self, plan_id: WorkoutPlanID) {
        self.workout_plans.insert(plan_id);
        self.current_plan_id = Some(plan_id);
    }

    /// Removes the plan from the membership set. The current-plan pointer is
    /// cleared only when it points at the removed plan.
    pub fn withdraw(&mut self, plan_id: WorkoutPlanID) {
        self.workout_plans.remove(&plan_id);
        if self.current_plan_id == Some(plan_id) {
            self.current_plan_id = None;
        }
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StudentID(Uuid);

impl StudentID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for StudentID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for StudentID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PersonalInfo {
    /// Most recent recorded body weight, used as the working load of
    /// body-weight exercises at session time.
    pub current_weight: Option<Weight>,
    /// Height in centimeters.
    pub height: Option<f32>,
    pub experience: Option<TrainingExperience>,
    pub training_days: Vec<Weekday>,
    pub preferred_times: Vec<NaiveTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingExperience {
    Beginner,
    Intermediate,
    Advanced,
    Athlete,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HealthRestrictions {
    pub chronic_conditions: Vec<String>,
    pub medications: Vec<String>,
    pub medical_authorization: bool,
    pub doctor_contact: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub description: String,
    pub target_value: Option<f32>,
    pub target_date: Option<NaiveDate>,
    pub achieved: bool,
}

/// One measurement snapshot in the append-only progress log.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    pub date: DateTime<Utc>,
    pub weight: Weight,
    pub measurements: Measurements,
    pub body_fat_percentage: Option<f32>,
    pub notes: Option<String>,
}

/// Circumferences in centimeters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Measurements {
    pub chest: Option<f32>,
    pub waist: Option<f32>,
    pub abdomen: Option<f32>,
    pub hips: Option<f32>,
    pub right_arm: Option<f32>,
    pub left_arm: Option<f32>,
    pub right_thigh: Option<f32>,
    pub left_thigh: Option<f32>,
    pub right_calf: Option<f32>,
    pub left_calf: Option<f32>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StudentStatus {
    #[default]
    Active,
    Paused,
    Inactive,
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StudentStatus::Active => "active",
                StudentStatus::Paused => "paused",
                StudentStatus::Inactive => "inactive",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn student() -> Student {
        Student {
            id: 1.into(),
            user_id: 1.into(),
            instructor_id: Some(1.into()),
            current_plan_id: None,
            workout_plans: BTreeSet::new(),
            personal_info: PersonalInfo::default(),
            health: HealthRestrictions::default(),
            goals: vec![],
            progress_history: vec![],
            status: StudentStatus::Active,
        }
    }

    #[test]
    fn test_student_enroll() {
        let mut student = student();
        student.enroll(7.into());
        assert!(student.enrolled_in(7.into()));
        assert_eq!(student.current_plan_id, Some(7.into()));

        student.enroll(7.into());
        assert_eq!(student.workout_plans.len(), 1);
    }

    #[test]
    fn test_student_withdraw_clears_matching_pointer() {
        let mut student = student();
        student.enroll(7.into());
        student.withdraw(7.into());
        assert!(!student.enrolled_in(7.into()));
        assert_eq!(student.current_plan_id, None);
    }

    #[test]
    fn test_student_withdraw_keeps_unrelated_pointer() {
        let mut student = student();
        student.enroll(7.into());
        student.enroll(8.into());
        student.withdraw(7.into());
        assert!(student.enrolled_in(8.into()));
        assert_eq!(student.current_plan_id, Some(8.into()));
    }

    #[test]
    fn test_student_id_nil() {
        assert!(StudentID::nil().is_nil());
        assert_eq!(StudentID::nil(), StudentID::default());
    }
}
