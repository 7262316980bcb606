//! Truck DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::domain::truck::{
    HistoryEntry, ReceptionStatus, Truck, TruckOrder, TruckProducts, TruckQuery, TruckStatus,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEntryDto {
    pub event: String,
    /// "admin" or "gerant"
    pub by: String,
    pub date: String,
}

impl From<&HistoryEntry> for HistoryEntryDto {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            event: entry.event.clone(),
            by: entry.by.to_string(),
            date: entry.date.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TruckProductsDto {
    pub lot_number: String,
    pub bag_count: u32,
    pub gross_weight_kg: f64,
    pub net_weight_kg: f64,
}

impl From<&TruckProducts> for TruckProductsDto {
    fn from(p: &TruckProducts) -> Self {
        Self {
            lot_number: p.lot_number.clone(),
            bag_count: p.bag_count,
            gross_weight_kg: p.gross_weight_kg,
            net_weight_kg: p.net_weight_kg,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TruckDto {
    pub id: String,
    pub entrepot_id: String,
    pub immatriculation: String,
    pub transporteur: String,
    pub transfert: String,
    pub cooperative: String,
    pub kor: Option<String>,
    pub th: Option<String>,
    /// Primary status label, e.g. "En attente"
    pub statut: String,
    /// Sub-state marker, e.g. "REFUSE_RENVOYE"
    pub advanced_status: Option<String>,
    pub created_at: String,
    pub heure_arrivee: String,
    pub refused_at: Option<String>,
    pub validated_at: Option<String>,
    pub renvoye_at: Option<String>,
    pub final_accepted_at: Option<String>,
    pub decharge_at: Option<String>,
    pub history: Vec<HistoryEntryDto>,
    pub products: Option<TruckProductsDto>,
    pub unread_for_admin: bool,
    pub unread_for_gerant: bool,
    pub comment: Option<String>,
    pub version: u64,
}

impl From<Truck> for TruckDto {
    fn from(t: Truck) -> Self {
        Self {
            id: t.id.to_string(),
            entrepot_id: t.entrepot_id.to_string(),
            immatriculation: t.immatriculation,
            transporteur: t.transporteur,
            transfert: t.transfert,
            cooperative: t.cooperative,
            kor: t.kor,
            th: t.th,
            statut: t.statut.to_string(),
            advanced_status: t.advanced_status.map(|a| a.to_string()),
            created_at: t.created_at.to_rfc3339(),
            heure_arrivee: t.heure_arrivee.to_rfc3339(),
            refused_at: t.refused_at.map(|d| d.to_rfc3339()),
            validated_at: t.validated_at.map(|d| d.to_rfc3339()),
            renvoye_at: t.renvoye_at.map(|d| d.to_rfc3339()),
            final_accepted_at: t.final_accepted_at.map(|d| d.to_rfc3339()),
            decharge_at: t.decharge_at.map(|d| d.to_rfc3339()),
            history: t.history.iter().map(HistoryEntryDto::from).collect(),
            products: t.products.as_ref().map(TruckProductsDto::from),
            unread_for_admin: t.unread_for_admin,
            unread_for_gerant: t.unread_for_gerant,
            comment: t.comment,
            version: t.version,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterTruckRequest {
    #[validate(length(min = 1, max = 50))]
    pub immatriculation: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub transporteur: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub transfert: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub cooperative: String,
    /// "enregistrer" (default) or "refouler"
    #[serde(default)]
    pub reception_status: Option<String>,
}

impl RegisterTruckRequest {
    pub fn reception(&self) -> ReceptionStatus {
        match self.reception_status.as_deref() {
            Some("refouler") => ReceptionStatus::Refouler,
            _ => ReceptionStatus::Enregistrer,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitAnalysisRequest {
    #[validate(length(min = 1, max = 50))]
    pub kor: String,
    #[validate(length(min = 1, max = 50))]
    pub th: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefuseTruckRequest {
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AcceptTruckRequest {
    #[validate(length(min = 1, max = 50))]
    pub lot_number: String,
    #[validate(range(min = 1))]
    pub bag_count: u32,
    #[validate(range(min = 0.0))]
    pub gross_weight_kg: f64,
    #[validate(range(min = 0.0))]
    pub net_weight_kg: f64,
}

impl AcceptTruckRequest {
    pub fn products(&self) -> TruckProducts {
        TruckProducts {
            lot_number: self.lot_number.clone(),
            bag_count: self.bag_count,
            gross_weight_kg: self.gross_weight_kg,
            net_weight_kg: self.net_weight_kg,
        }
    }
}

/// Filter parameters shared by the truck list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListTrucksParams {
    /// Tab: all, enregistres, en_attente, valides, refuses, renvoyes,
    /// acceptes, decharges, refoules
    pub tab: Option<String>,
    /// Case-insensitive substring over plate, carrier, transfer, coop
    pub search: Option<String>,
    /// Period: all, today, 7days, 30days
    pub period: Option<String>,
    /// Exact primary status, e.g. "En attente"
    pub statut: Option<String>,
    /// Ordering: insertion or newest_first
    pub order: Option<String>,
    /// Narrow the cross-warehouse view to one warehouse
    pub entrepot_id: Option<Uuid>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}
fn default_page_size() -> u32 {
    20
}

impl ListTrucksParams {
    /// Build the domain query; `default_order` differs between the
    /// per-warehouse view (insertion) and the history view (newest first).
    pub fn to_query(&self, default_order: TruckOrder) -> TruckQuery {
        TruckQuery {
            tab: self.tab.as_deref().map(Into::into).unwrap_or_default(),
            search: self.search.clone(),
            period: self.period.as_deref().map(Into::into).unwrap_or_default(),
            statut: self.statut.as_deref().map(TruckStatus::from),
            order: match self.order.as_deref() {
                Some("newest_first") => TruckOrder::NewestFirst,
                Some("insertion") => TruckOrder::Insertion,
                _ => default_order,
            },
        }
    }
}
