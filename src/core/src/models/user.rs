use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// A platform account. Stored as one element of the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
    /// Opaque credential material owned by the authentication collaborator.
    pub password_secret: String,
    pub role: Role,
    #[serde(default)]
    pub profile_image_ref: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl User {
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }
}
