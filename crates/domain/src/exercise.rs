use std::fmt;
use std::slice::Iter;

use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, EquipmentID, InstructorID, Name, ReadError, UpdateError,
};

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self, instructor_id: InstructorID) -> Result<Vec<Exercise>, ReadError>;
    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(&self, exercise: Exercise) -> Result<Exercise, CreateError>;
    async fn update_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(&self, exercise: Exercise) -> Result<Exercise, CreateError>;
    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

/// Instructor-authored catalog entry describing how an exercise is performed.
/// Plan divisions embed their own copies of the prescription values, so
/// catalog edits never alter existing plans.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub instructor_id: InstructorID,
    pub name: Name,
    pub description: Option<String>,
    pub how_to_perform: String,
    pub category: ExerciseCategory,
    pub muscle_groups: Vec<MuscleGroup>,
    pub equipment_id: Option<EquipmentID>,
    pub image: Option<String>,
    pub difficulty: ExperienceLevel,
    pub safety_tips: Option<String>,
    pub variations: Vec<String>,
    pub video_url: Option<String>,
    pub active: bool,
    pub usage_count: u32,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseCategory {
    #[default]
    Strength,
    Cardio,
    Flexibility,
    Endurance,
    Power,
    Other,
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ExerciseCategory::Strength => "strength",
                ExerciseCategory::Cardio => "cardio",
                ExerciseCategory::Flexibility => "flexibility",
                ExerciseCategory::Endurance => "endurance",
                ExerciseCategory::Power => "power",
                ExerciseCategory::Other => "other",
            }
        )
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ExperienceLevel::Beginner => "beginner",
                ExperienceLevel::Intermediate => "intermediate",
                ExperienceLevel::Advanced => "advanced",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Abs,
    Legs,
    Glutes,
    Calves,
    FullBody,
}

impl MuscleGroup {
    pub fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLE_GROUPS: [MuscleGroup; 11] = [
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Shoulders,
            MuscleGroup::Biceps,
            MuscleGroup::Triceps,
            MuscleGroup::Forearms,
            MuscleGroup::Abs,
            MuscleGroup::Legs,
            MuscleGroup::Glutes,
            MuscleGroup::Calves,
            MuscleGroup::FullBody,
        ];
        MUSCLE_GROUPS.iter()
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MuscleGroup::Chest => "chest",
                MuscleGroup::Back => "back",
                MuscleGroup::Shoulders => "shoulders",
                MuscleGroup::Biceps => "biceps",
                MuscleGroup::Triceps => "triceps",
                MuscleGroup::Forearms => "forearms",
                MuscleGroup::Abs => "abs",
                MuscleGroup::Legs => "legs",
                MuscleGroup::Glutes => "glutes",
                MuscleGroup::Calves => "calves",
                MuscleGroup::FullBody => "full body",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_exercise_id_nil() {
        assert!(ExerciseID::nil().is_nil());
        assert_eq!(ExerciseID::nil(), ExerciseID::default());
    }

    #[test]
    fn test_muscle_group_iter_is_exhaustive() {
        assert_eq!(MuscleGroup::iter().count(), 11);
    }

    #[rstest]
    #[case(MuscleGroup::Chest, "chest")]
    #[case(MuscleGroup::FullBody, "full body")]
    fn test_muscle_group_display(#[case] muscle_group: MuscleGroup, #[case] string: &str) {
        assert_eq!(muscle_group.to_string(), string);
    }

    #[rstest]
    #[case(ExerciseCategory::Strength, "strength")]
    #[case(ExerciseCategory::Other, "other")]
    fn test_exercise_category_display(#[case] category: ExerciseCategory, #[case] string: &str) {
        assert_eq!(category.to_string(), string);
    }
}
