//! Warehouse domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Warehouse (entrepôt) entity.
///
/// Owns zero or more trucks by `entrepot_id` reference; deleting a
/// warehouse cascades to its trucks.
#[derive(Debug, Clone, PartialEq)]
pub struct Warehouse {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Warehouse {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location: location.into(),
            image_url: None,
            created_at: Utc::now(),
        }
    }
}
