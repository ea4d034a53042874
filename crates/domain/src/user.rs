use std::fmt;

use chrono::NaiveDate;
use derive_more::{AsRef, Deref, Display};
use uuid::Uuid;

use crate::{CreateError, Name, ReadError};

#[allow(async_fn_in_trait)]
pub trait UserService {
    async fn get_users(&self) -> Result<Vec<User>, ReadError>;
    async fn get_user(&self, id: UserID) -> Result<User, ReadError>;
    async fn register_user(&self, user: User) -> Result<User, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait UserRepository {
    async fn read_users(&self) -> Result<Vec<User>, ReadError>;
    async fn read_user(&self, id: UserID) -> Result<User, ReadError>;
    async fn create_user(&self, user: User) -> Result<User, CreateError>;
}

/// Account record shared by students and instructors. The password hash is
/// treated as an opaque string, hashing happens outside the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub name: Name,
    pub email: Email,
    pub cpf: Cpf,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub password_hash: String,
    pub role: Role,
    pub avatar: Option<String>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(Uuid);

impl UserID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for UserID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for UserID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Email(String);

impl Email {
    pub fn new(email: &str) -> Result<Self, EmailError> {
        let trimmed = email.trim();

        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
                Ok(Email(trimmed.to_lowercase()))
            }
            _ => Err(EmailError::Invalid(trimmed.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EmailError {
    #[error("Invalid email address ({0})")]
    Invalid(String),
}

/// Brazilian taxpayer number, stored as its eleven digits.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cpf(String);

impl Cpf {
    pub fn new(cpf: &str) -> Result<Self, CpfError> {
        let digits = cpf
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>();

        if digits.len() != 11 {
            return Err(CpfError::Invalid(cpf.to_string()));
        }

        Ok(Cpf(digits))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CpfError {
    #[error("CPF must contain eleven digits ({0})")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Instructor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Role::Student => "student",
                Role::Instructor => "instructor",
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
    fn test_user_id_nil() {
        assert!(UserID::nil().is_nil());
        assert_eq!(UserID::nil(), UserID::default());
    }

    #[rstest]
    #[case("alice@example.com", Ok(Email(String::from("alice@example.com"))))]
    #[case("  Bob@Example.COM ", Ok(Email(String::from("bob@example.com"))))]
    #[case("no-at-sign", Err(EmailError::Invalid(String::from("no-at-sign"))))]
    #[case("@example.com", Err(EmailError::Invalid(String::from("@example.com"))))]
    #[case("alice@nodot", Err(EmailError::Invalid(String::from("alice@nodot"))))]
    fn test_email_new(#[case] email: &str, #[case] expected: Result<Email, EmailError>) {
        assert_eq!(Email::new(email), expected);
    }

    #[rstest]
    #[case("123.456.789-09", Ok(Cpf(String::from("12345678909"))))]
    #[case("12345678909", Ok(Cpf(String::from("12345678909"))))]
    #[case("1234567890", Err(CpfError::Invalid(String::from("1234567890"))))]
    fn test_cpf_new(#[case] cpf: &str, #[case] expected: Result<Cpf, CpfError>) {
        assert_eq!(Cpf::new(cpf), expected);
    }

    #[rstest]
    #[case(Role::Student, "student")]
    #[case(Role::Instructor, "instructor")]
    fn test_role_display(#[case] role: Role, #[case] string: &str) {
        assert_eq!(role.to_string(), string);
    }
}
