//! User model.

use serde::{Deserialize, Serialize};

use super::UserRole;

/// An application user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Full name, may be empty.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
}

impl User {
    /// Returns the full name when set, otherwise the username.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.username
        } else {
            &self.name
        }
    }

    /// Returns true for application administrators.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Fields accepted when creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl NewUser {
    /// Creates a regular user with only a username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: String::new(),
            email: String::new(),
            role: UserRole::User,
        }
    }
}
