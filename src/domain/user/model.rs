//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Operator,
    Driver,
    Security,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Operator
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Operator => write!(f, "operator"),
            Self::Driver => write!(f, "driver"),
            Self::Security => write!(f, "security"),
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            "driver" => Self::Driver,
            "security" => Self::Security,
            _ => Self::Operator,
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    #[serde(rename = "Actif")]
    Actif,
    #[serde(rename = "Inactif")]
    Inactif,
    #[serde(rename = "En attente")]
    EnAttente,
}

impl Default for UserStatus {
    fn default() -> Self {
        Self::Actif
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Actif => write!(f, "Actif"),
            Self::Inactif => write!(f, "Inactif"),
            Self::EnAttente => write!(f, "En attente"),
        }
    }
}

impl From<&str> for UserStatus {
    fn from(s: &str) -> Self {
        match s {
            "Inactif" => Self::Inactif,
            "En attente" => Self::EnAttente,
            _ => Self::Actif,
        }
    }
}

/// Staff account.
///
/// `entrepot_id = None` means unrestricted scope (admins); everyone else
/// is bound to one warehouse. Passwords are stored as bcrypt hashes only.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub nom: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub entrepot_id: Option<Uuid>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Actif
    }
}
