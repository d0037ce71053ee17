use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: String,
    pub full_name: String,
    pub role: Role,
    pub department: Option<String>,
    pub year: Option<String>,
    pub section: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Student => "Student",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "Admin" => Some(Role::Admin),
            "Student" => Some(Role::Student),
            _ => None,
        }
    }

    /// Where a freshly logged-in account lands.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Student => "/dashboard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub user_id: String,
    pub full_name: String,
    pub password: String,
    pub role: Role,
    pub department: Option<String>,
    pub year: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateStudentRequest {
    pub full_name: String,
    pub department: Option<String>,
    pub year: Option<String>,
    pub section: Option<String>,
}

/// Normalise a typed-in identifier the way accounts are stored.
pub fn normalize_user_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}
