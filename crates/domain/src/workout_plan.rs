use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, EquipmentID, ExerciseID, InstructorID, MuscleGroup, Name, ReadError,
    Reps, Seconds, SetCount, Student, StudentID, UpdateError, Weight,
};

/// Plan CRUD plus the two-sided reference maintenance between plans and
/// students. Every mutation issues paired writes to both collections with no
/// cross-collection transaction; a failure between the two writes leaves the
/// references inconsistent.
#[allow(async_fn_in_trait)]
pub trait WorkoutPlanService {
    async fn get_workout_plans(
        &self,
        instructor_id: InstructorID,
    ) -> Result<Vec<WorkoutPlan>, ReadError>;
    async fn get_workout_plan(&self, id: WorkoutPlanID) -> Result<WorkoutPlan, ReadError>;
    async fn create_workout_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, CreateError>;
    async fn assign_plan_to_student(
        &self,
        plan_id: WorkoutPlanID,
        student_id: StudentID,
    ) -> Result<(Student, WorkoutPlan), UpdateError>;
    async fn unassign_plan_from_student(
        &self,
        plan_id: WorkoutPlanID,
        student_id: StudentID,
    ) -> Result<(Student, WorkoutPlan), UpdateError>;
    async fn update_workout_plan(
        &self,
        instructor_id: InstructorID,
        id: WorkoutPlanID,
        name: Option<Name>,
        description: Option<String>,
        goal: Option<String>,
        divisions: Option<Vec<Division>>,
        assigned_students: Option<BTreeSet<StudentID>>,
    ) -> Result<WorkoutPlan, UpdateError>;
    async fn delete_workout_plan(
        &self,
        instructor_id: InstructorID,
        id: WorkoutPlanID,
    ) -> Result<WorkoutPlanID, DeleteError>;
    async fn plan_students(&self, plan_id: WorkoutPlanID) -> Result<Vec<Student>, ReadError>;
    async fn student_plans(&self, student_id: StudentID) -> Result<Vec<PlanWithStats>, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutPlanRepository {
    async fn read_plans(&self) -> Result<Vec<WorkoutPlan>, ReadError>;
    async fn read_plan(&self, id: WorkoutPlanID) -> Result<WorkoutPlan, ReadError>;
    async fn create_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, CreateError>;
    async fn replace_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, UpdateError>;
    async fn delete_plan(&self, id: WorkoutPlanID) -> Result<WorkoutPlanID, DeleteError>;
}

/// A reusable training program. `assigned_students` is the inverse side of
/// `Student::workout_plans`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutPlan {
    pub id: WorkoutPlanID,
    pub instructor_id: InstructorID,
    pub name: Name,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub divisions: Vec<Division>,
    pub assigned_students: BTreeSet<StudentID>,
    pub created_at: DateTime<Utc>,
}

impl WorkoutPlan {
    #[must_use]
    pub fn division(&self, index: usize) -> Option<&Division> {
        self.divisions.get(index)
    }

    #[must_use]
    pub fn num_sets(&self) -> u32 {
        self.divisions.iter().map(Division::num_sets).sum()
    }

    #[must_use]
    pub fn owned_by(&self, instructor_id: InstructorID) -> bool {
        self.instructor_id == instructor_id
    }

    #[must_use]
    pub fn exercises(&self) -> BTreeSet<ExerciseID> {
        self.divisions
            .iter()
            .flat_map(|d| &d.exercises)
            .filter_map(|e| e.exercise_id)
            .collect::<BTreeSet<_>>()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutPlanID(Uuid);

impl WorkoutPlanID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutPlanID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutPlanID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// A named, ordered group of exercises within a plan (e.g. "Workout A").
#[derive(Debug, Clone, PartialEq)]
pub struct Division {
    pub name: Name,
    pub muscle_groups: Vec<MuscleGroup>,
    pub exercises: Vec<PlanExercise>,
}

impl Division {
    #[must_use]
    pub fn num_sets(&self) -> u32 {
        self.exercises.iter().map(|e| u32::from(e.sets)).sum()
    }
}

/// Exercise prescription embedded in a division. An `ideal_weight` of zero
/// marks a body-weight exercise whose working load is resolved from the
/// student's recorded weight at session time.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanExercise {
    pub exercise_id: Option<ExerciseID>,
    pub name: Name,
    pub description: Option<String>,
    pub sets: SetCount,
    pub reps: Reps,
    pub ideal_weight: Weight,
    pub rest_time: Seconds,
    pub to_failure: bool,
    pub equipment_id: Option<EquipmentID>,
}

impl PlanExercise {
    #[must_use]
    pub fn is_body_weight(&self) -> bool {
        self.ideal_weight.is_zero()
    }
}

/// Student-facing plan listing entry with completion statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanWithStats {
    pub plan: WorkoutPlan,
    pub completed_sessions: u64,
    pub last_completed: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn plan_exercise(sets: u32, ideal_weight: f32) -> PlanExercise {
        PlanExercise {
            exercise_id: None,
            name: Name::new("Bench Press").unwrap(),
            description: None,
            sets: SetCount::new(sets).unwrap(),
            reps: Reps::new(10).unwrap(),
            ideal_weight: Weight::new(ideal_weight).unwrap(),
            rest_time: Seconds::default(),
            to_failure: false,
            equipment_id: None,
        }
    }

    fn plan() -> WorkoutPlan {
        WorkoutPlan {
            id: 1.into(),
            instructor_id: 1.into(),
            name: Name::new("Hypertrophy").unwrap(),
            description: None,
            goal: None,
            divisions: vec![
                Division {
                    name: Name::new("A").unwrap(),
                    muscle_groups: vec![MuscleGroup::Chest],
                    exercises: vec![plan_exercise(3, 20.0), plan_exercise(4, 0.0)],
                },
                Division {
                    name: Name::new("B").unwrap(),
                    muscle_groups: vec![MuscleGroup::Legs],
                    exercises: vec![plan_exercise(5, 60.0)],
                },
            ],
            assigned_students: BTreeSet::new(),
            created_at: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_plan_division_lookup() {
        let plan = plan();
        assert_eq!(plan.division(1).map(|d| d.name.clone()), Name::new("B").ok());
        assert_eq!(plan.division(2), None);
    }

    #[test]
    fn test_plan_num_sets() {
        assert_eq!(plan().num_sets(), 12);
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(20.0, false)]
    fn test_plan_exercise_is_body_weight(#[case] ideal_weight: f32, #[case] expected: bool) {
        assert_eq!(plan_exercise(3, ideal_weight).is_body_weight(), expected);
    }

    #[test]
    fn test_plan_owned_by() {
        assert!(plan().owned_by(1.into()));
        assert!(!plan().owned_by(2.into()));
    }

    #[test]
    fn test_workout_plan_id_nil() {
        assert!(WorkoutPlanID::nil().is_nil());
        assert_eq!(WorkoutPlanID::nil(), WorkoutPlanID::default());
    }
}
