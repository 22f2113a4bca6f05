//! User entity and the request/view shapes around it
//!
//! The entity is the stored representation. Requests carry no identity,
//! and `UserView` deliberately omits the id.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: i32,
}

/// Validated payload for creating a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    name: String,
    age: i32,
}

impl CreateUserRequest {
    /// Create a request, rejecting a blank name or a zero age.
    ///
    /// # Example
    /// ```
    /// use roster_server::models::CreateUserRequest;
    ///
    /// assert!(CreateUserRequest::new("Ada", 30).is_ok());
    /// assert!(CreateUserRequest::new("", 30).is_err());
    /// assert!(CreateUserRequest::new("Ada", 0).is_err());
    /// ```
    pub fn new(name: &str, age: i32) -> Result<Self, ValidationError> {
        let (name, age) = validate_fields(name, age)?;
        Ok(Self { name, age })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }
}

/// Validated payload for overwriting an existing user's fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    name: String,
    age: i32,
}

impl UpdateUserRequest {
    /// Same rules as [`CreateUserRequest::new`].
    pub fn new(name: &str, age: i32) -> Result<Self, ValidationError> {
        let (name, age) = validate_fields(name, age)?;
        Ok(Self { name, age })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    /// Overlay name and age onto an existing entity, keeping its id.
    pub fn apply_to(self, user: &mut User) {
        user.name = self.name;
        user.age = self.age;
    }
}

fn validate_fields(name: &str, age: i32) -> Result<(String, i32), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty { field: "name" });
    }
    if age == 0 {
        return Err(ValidationError::Zero { field: "age" });
    }
    Ok((name.to_owned(), age))
}

/// Client-facing user shape (no id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub name: String,
    pub age: i32,
}

impl From<&User> for UserView {
    fn from(u: &User) -> Self {
        Self {
            name: u.name.clone(),
            age: u.age,
        }
    }
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            name: u.name,
            age: u.age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        let err = CreateUserRequest::new("   ", 20).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "name" });
    }

    #[test]
    fn rejects_zero_age() {
        let err = UpdateUserRequest::new("Ada", 0).unwrap_err();
        assert_eq!(err, ValidationError::Zero { field: "age" });
    }

    #[test]
    fn update_keeps_identity() {
        let mut user = User {
            id: "abc".into(),
            name: "Ada".into(),
            age: 30,
        };
        UpdateUserRequest::new("Grace", 45).unwrap().apply_to(&mut user);

        assert_eq!(user.id, "abc");
        assert_eq!(user.name, "Grace");
        assert_eq!(user.age, 45);
    }

    #[test]
    fn view_omits_id() {
        let user = User {
            id: "secret-id".into(),
            name: "Ada".into(),
            age: 30,
        };
        let json = serde_json::to_value(UserView::from(&user)).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Ada", "age": 30 }));
    }
}
