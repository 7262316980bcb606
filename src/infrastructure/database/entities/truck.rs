//! Truck entity for database
//!
//! `history` and `products` are stored as JSON columns; the repository
//! tolerates malformed payloads (logged, treated as empty) so one bad row
//! never takes a list view down.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Truck model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trucks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entrepot_id: Uuid,
    pub immatriculation: String,
    pub transporteur: String,
    pub transfert: String,
    pub cooperative: String,
    pub kor: Option<String>,
    pub th: Option<String>,
    pub statut: String,
    pub advanced_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub heure_arrivee: DateTime<Utc>,
    pub refused_at: Option<DateTime<Utc>>,
    pub validated_at: Option<DateTime<Utc>>,
    pub renvoye_at: Option<DateTime<Utc>>,
    pub final_accepted_at: Option<DateTime<Utc>>,
    pub decharge_at: Option<DateTime<Utc>>,
    #[sea_orm(column_type = "Json")]
    pub history: Json,
    pub products: Option<Json>,
    pub unread_for_admin: bool,
    pub unread_for_gerant: bool,
    pub comment: Option<String>,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::EntrepotId",
        to = "super::warehouse::Column::Id"
    )]
    Warehouse,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
