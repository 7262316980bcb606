//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::User;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub nom: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub entrepot_id: Option<String>,
    pub status: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_string(),
            nom: u.nom,
            email: u.email,
            username: u.username,
            role: u.role.to_string(),
            entrepot_id: u.entrepot_id.map(|id| id.to_string()),
            status: u.status.to_string(),
            created_at: u.created_at.to_rfc3339(),
            last_login_at: u.last_login_at.map(|d| d.to_rfc3339()),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub nom: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 8, max = 100))]
    pub password: String,
    /// admin, operator, driver or security
    #[serde(default)]
    pub role: Option<String>,
    pub entrepot_id: Option<Uuid>,
    /// Actif, Inactif or "En attente"
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub nom: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(length(min = 8, max = 100))]
    pub password: Option<String>,
    pub role: Option<String>,
    /// Pass explicitly to re-assign; absent leaves the binding untouched
    pub entrepot_id: Option<Option<Uuid>>,
    pub status: Option<String>,
}
