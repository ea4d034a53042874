use std::collections::BTreeSet;

use chrono::{NaiveTime, Weekday};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, Email, GymID, Name, ReadError, StudentID, UpdateError, UserID, ValidationError,
};

#[allow(async_fn_in_trait)]
pub trait InstructorService {
    async fn get_instructors(&self) -> Result<Vec<Instructor>, ReadError>;
    async fn get_instructor(&self, id: InstructorID) -> Result<Instructor, ReadError>;
    async fn instructor_by_user(&self, user_id: UserID) -> Result<Option<Instructor>, ReadError>;
    async fn create_instructor(&self, instructor: Instructor) -> Result<Instructor, CreateError>;
    async fn update_instructor(&self, instructor: Instructor) -> Result<Instructor, UpdateError>;

    fn validate_instructor(&self, instructor: &Instructor) -> Result<(), ValidationError> {
        if instructor.bio.trim().chars().count() < 50 {
            return Err(ValidationError::Other(
                "Bio must be at least 50 characters".into(),
            ));
        }
        if instructor.certifications.is_empty() {
            return Err(ValidationError::Required("certifications"));
        }
        if instructor.specialties.is_empty() {
            return Err(ValidationError::Required("specialties"));
        }
        if instructor.availability.working_days.is_empty() {
            return Err(ValidationError::Required("working days"));
        }
        if instructor.max_students == 0 {
            return Err(ValidationError::Other(
                "Student capacity must be at least one".into(),
            ));
        }
        Ok(())
    }
}

#[allow(async_fn_in_trait)]
pub trait InstructorRepository {
    async fn read_instructors(&self) -> Result<Vec<Instructor>, ReadError>;
    async fn read_instructor(&self, id: InstructorID) -> Result<Instructor, ReadError>;
    async fn find_instructor_by_user(&self, user_id: UserID) -> Result<Option<Instructor>, ReadError>;
    async fn create_instructor(&self, instructor: Instructor) -> Result<Instructor, CreateError>;
    async fn replace_instructor(&self, instructor: Instructor) -> Result<Instructor, UpdateError>;
}

/// Professional profile of a personal trainer. Name and email mirror the
/// linked account record so roster listings avoid a second lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Instructor {
    pub id: InstructorID,
    pub user_id: UserID,
    pub name: Name,
    pub email: Email,
    pub phone: Option<String>,
    pub cref: Option<String>,
    pub years_of_experience: u32,
    pub bio: String,
    pub certifications: Vec<String>,
    pub specialties: Vec<String>,
    pub availability: Availability,
    pub max_students: u32,
    pub students: BTreeSet<StudentID>,
    pub gym_id: Option<GymID>,
    pub active: bool,
}

impl Instructor {
    #[must_use]
    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    #[must_use]
    pub fn can_add_student(&self) -> bool {
        self.students.len() < self.max_students as usize
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct InstructorID(Uuid);

impl InstructorID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for InstructorID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for InstructorID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub working_days: Vec<Weekday>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn instructor(max_students: u32, students: &[u128]) -> Instructor {
        Instructor {
            id: 1.into(),
            user_id: 1.into(),
            name: Name::new("Carol").unwrap(),
            email: Email::new("carol@example.com").unwrap(),
            phone: None,
            cref: None,
            years_of_experience: 5,
            bio: String::from("B"),
            certifications: vec![String::from("CREF")],
            specialties: vec![String::from("strength")],
            availability: Availability {
                working_days: vec![Weekday::Mon, Weekday::Wed],
                start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            },
            max_students,
            students: students.iter().map(|id| StudentID::from(*id)).collect(),
            gym_id: None,
            active: true,
        }
    }

    #[rstest]
    #[case(2, &[], true)]
    #[case(2, &[1], true)]
    #[case(2, &[1, 2], false)]
    fn test_instructor_can_add_student(
        #[case] max_students: u32,
        #[case] students: &[u128],
        #[case] expected: bool,
    ) {
        assert_eq!(instructor(max_students, students).can_add_student(), expected);
    }

    #[test]
    fn test_instructor_student_count() {
        assert_eq!(instructor(5, &[1, 2, 3]).student_count(), 3);
    }

    #[test]
    fn test_instructor_id_nil() {
        assert!(InstructorID::nil().is_nil());
        assert_eq!(InstructorID::nil(), InstructorID::default());
    }
}
