//! Warehouse DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Warehouse, WarehouseTruckStats};

#[derive(Debug, Serialize, ToSchema)]
pub struct WarehouseDto {
    pub id: String,
    pub name: String,
    pub location: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<Warehouse> for WarehouseDto {
    fn from(w: Warehouse) -> Self {
        Self {
            id: w.id.to_string(),
            name: w.name,
            location: w.location,
            image_url: w.image_url,
            created_at: w.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub location: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateWarehouseRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// Dashboard counters for one warehouse
#[derive(Debug, Serialize, ToSchema)]
pub struct WarehouseStatsDto {
    pub total: usize,
    pub enregistres: usize,
    pub en_attente: usize,
    pub valides_en_cours: usize,
    pub acceptes: usize,
    pub decharges: usize,
    pub annules: usize,
    pub refoules: usize,
    pub unread_for_admin: usize,
    pub unread_for_gerant: usize,
}

impl From<WarehouseTruckStats> for WarehouseStatsDto {
    fn from(s: WarehouseTruckStats) -> Self {
        Self {
            total: s.total,
            enregistres: s.enregistres,
            en_attente: s.en_attente,
            valides_en_cours: s.valides_en_cours,
            acceptes: s.acceptes,
            decharges: s.decharges,
            annules: s.annules,
            refoules: s.refoules,
            unread_for_admin: s.unread_for_admin,
            unread_for_gerant: s.unread_for_gerant,
        }
    }
}
