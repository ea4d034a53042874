use std::fmt;

use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExperienceLevel, GymID, InstructorID, MuscleGroup, Name, ReadError,
    UpdateError,
};

#[allow(async_fn_in_trait)]
pub trait EquipmentService {
    async fn get_equipment(&self, instructor_id: InstructorID) -> Result<Vec<Equipment>, ReadError>;
    async fn get_equipment_item(&self, id: EquipmentID) -> Result<Equipment, ReadError>;
    async fn create_equipment(&self, equipment: Equipment) -> Result<Equipment, CreateError>;
    async fn update_equipment(&self, equipment: Equipment) -> Result<Equipment, UpdateError>;
    async fn delete_equipment(&self, id: EquipmentID) -> Result<EquipmentID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait EquipmentRepository {
    async fn read_equipment(&self) -> Result<Vec<Equipment>, ReadError>;
    async fn read_equipment_item(&self, id: EquipmentID) -> Result<Equipment, ReadError>;
    async fn create_equipment(&self, equipment: Equipment) -> Result<Equipment, CreateError>;
    async fn replace_equipment(&self, equipment: Equipment) -> Result<Equipment, UpdateError>;
    async fn delete_equipment(&self, id: EquipmentID) -> Result<EquipmentID, DeleteError>;
}

/// Instructor-owned equipment catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Equipment {
    pub id: EquipmentID,
    pub instructor_id: InstructorID,
    pub gym_id: Option<GymID>,
    pub name: Name,
    pub description: String,
    pub category: EquipmentCategory,
    pub muscle_groups: Vec<MuscleGroup>,
    pub image: Option<String>,
    pub available: bool,
    pub difficulty: ExperienceLevel,
    pub safety_tips: Vec<String>,
    pub usage_count: u32,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EquipmentID(Uuid);

impl EquipmentID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for EquipmentID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for EquipmentID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentCategory {
    Cardio,
    #[default]
    Strength,
    Functional,
    Crossfit,
    FreeWeights,
    Other,
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EquipmentCategory::Cardio => "cardio",
                EquipmentCategory::Strength => "strength",
                EquipmentCategory::Functional => "functional",
                EquipmentCategory::Crossfit => "crossfit",
                EquipmentCategory::FreeWeights => "free weights",
                EquipmentCategory::Other => "other",
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
    fn test_equipment_id_nil() {
        assert!(EquipmentID::nil().is_nil());
        assert_eq!(EquipmentID::nil(), EquipmentID::default());
    }

    #[rstest]
    #[case(EquipmentCategory::Cardio, "cardio")]
    #[case(EquipmentCategory::FreeWeights, "free weights")]
    fn test_equipment_category_display(#[case] category: EquipmentCategory, #[case] string: &str) {
        assert_eq!(category.to_string(), string);
    }
}
