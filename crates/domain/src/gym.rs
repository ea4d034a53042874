use std::collections::BTreeSet;
use std::fmt;

use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, Email, InstructorID, Name, ReadError, StudentID, UpdateError,
};

#[allow(async_fn_in_trait)]
pub trait GymService {
    async fn get_gyms(&self) -> Result<Vec<Gym>, ReadError>;
    async fn get_gym(&self, id: GymID) -> Result<Gym, ReadError>;
    async fn create_gym(&self, gym: Gym) -> Result<Gym, CreateError>;
    async fn update_gym(&self, gym: Gym) -> Result<Gym, UpdateError>;
    async fn delete_gym(&self, id: GymID) -> Result<GymID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait GymRepository {
    async fn read_gyms(&self) -> Result<Vec<Gym>, ReadError>;
    async fn read_gym(&self, id: GymID) -> Result<Gym, ReadError>;
    async fn create_gym(&self, gym: Gym) -> Result<Gym, CreateError>;
    async fn replace_gym(&self, gym: Gym) -> Result<Gym, UpdateError>;
    async fn delete_gym(&self, id: GymID) -> Result<GymID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gym {
    pub id: GymID,
    pub name: Name,
    pub description: Option<String>,
    pub image: Option<String>,
    pub location: Location,
    pub phone: String,
    pub email: Option<Email>,
    pub equipment: Vec<GymEquipment>,
    pub instructors: BTreeSet<InstructorID>,
    pub students: BTreeSet<StudentID>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct GymID(Uuid);

impl GymID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for GymID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for GymID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Equipment summary embedded in the gym document, independent of the
/// instructor-owned equipment catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct GymEquipment {
    pub name: Name,
    pub quantity: u32,
    pub condition: EquipmentCondition,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentCondition {
    Excellent,
    #[default]
    Good,
    NeedsRepair,
}

impl fmt::Display for EquipmentCondition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EquipmentCondition::Excellent => "excellent",
                EquipmentCondition::Good => "good",
                EquipmentCondition::NeedsRepair => "needs repair",
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
    fn test_gym_id_nil() {
        assert!(GymID::nil().is_nil());
        assert_eq!(GymID::nil(), GymID::default());
    }

    #[rstest]
    #[case(EquipmentCondition::Excellent, "excellent")]
    #[case(EquipmentCondition::Good, "good")]
    #[case(EquipmentCondition::NeedsRepair, "needs repair")]
    fn test_equipment_condition_display(
        #[case] condition: EquipmentCondition,
        #[case] string: &str,
    ) {
        assert_eq!(condition.to_string(), string);
    }
}
