//! Truck domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Primary truck status.
///
/// Canonical set consolidated from the reception flow; the labels are the
/// French ones shown to staff and stored on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruckStatus {
    /// Registered at the front desk, waiting for analysis
    #[serde(rename = "Enregistré")]
    Enregistre,
    /// Analysis submitted, waiting for an admin decision
    #[serde(rename = "En attente")]
    EnAttente,
    /// Accepted by an admin
    #[serde(rename = "Validé")]
    Valide,
    /// Turned away at the gate, never entered the flow
    #[serde(rename = "Refoulé")]
    Refoule,
    /// Unloading finished
    #[serde(rename = "Déchargé")]
    Decharge,
    /// Refused by an admin
    #[serde(rename = "Annulé")]
    Annule,
}

impl Default for TruckStatus {
    fn default() -> Self {
        Self::Enregistre
    }
}

impl std::fmt::Display for TruckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enregistre => write!(f, "Enregistré"),
            Self::EnAttente => write!(f, "En attente"),
            Self::Valide => write!(f, "Validé"),
            Self::Refoule => write!(f, "Refoulé"),
            Self::Decharge => write!(f, "Déchargé"),
            Self::Annule => write!(f, "Annulé"),
        }
    }
}

impl From<&str> for TruckStatus {
    fn from(s: &str) -> Self {
        match s {
            "Enregistré" => Self::Enregistre,
            "En attente" => Self::EnAttente,
            "Validé" => Self::Valide,
            "Refoulé" => Self::Refoule,
            "Déchargé" => Self::Decharge,
            "Annulé" => Self::Annule,
            _ => Self::Enregistre,
        }
    }
}

impl From<String> for TruckStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// Secondary workflow marker refining `TruckStatus`.
///
/// Only meaningful together with the primary status: the refuse sub-states
/// live under `Annulé` (then `En attente` after reintegration), the final
/// acceptance under `Validé`/`Déchargé`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvancedTruckStatus {
    #[serde(rename = "REFUSE_EN_ATTENTE_GERANT")]
    RefuseEnAttenteGerant,
    #[serde(rename = "REFUSE_RENVOYE")]
    RefuseRenvoye,
    #[serde(rename = "REFUSE_REINTEGRE")]
    RefuseReintegre,
    #[serde(rename = "ACCEPTE_FINAL")]
    AccepteFinal,
}

impl std::fmt::Display for AdvancedTruckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RefuseEnAttenteGerant => write!(f, "REFUSE_EN_ATTENTE_GERANT"),
            Self::RefuseRenvoye => write!(f, "REFUSE_RENVOYE"),
            Self::RefuseReintegre => write!(f, "REFUSE_REINTEGRE"),
            Self::AccepteFinal => write!(f, "ACCEPTE_FINAL"),
        }
    }
}

impl AdvancedTruckStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "REFUSE_EN_ATTENTE_GERANT" => Some(Self::RefuseEnAttenteGerant),
            "REFUSE_RENVOYE" => Some(Self::RefuseRenvoye),
            "REFUSE_REINTEGRE" => Some(Self::RefuseReintegre),
            "ACCEPTE_FINAL" => Some(Self::AccepteFinal),
            _ => None,
        }
    }
}

/// Who performed a workflow action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Admin,
    Gerant,
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Gerant => write!(f, "gerant"),
        }
    }
}

/// One line of the per-truck audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub event: String,
    pub by: Actor,
    pub date: DateTime<Utc>,
}

/// Product data recorded by the manager at final acceptance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckProducts {
    pub lot_number: String,
    pub bag_count: u32,
    pub gross_weight_kg: f64,
    pub net_weight_kg: f64,
}

/// Front-desk decision when a truck shows up at the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceptionStatus {
    /// Normal reception, truck enters the workflow
    Enregistrer,
    /// Turned away immediately
    Refouler,
}

impl Default for ReceptionStatus {
    fn default() -> Self {
        Self::Enregistrer
    }
}

/// Descriptive fields captured on the registration form
#[derive(Debug, Clone, Default)]
pub struct TruckRegistration {
    pub immatriculation: String,
    pub transporteur: String,
    pub transfert: String,
    pub cooperative: String,
}

/// Truck entity
#[derive(Debug, Clone, PartialEq)]
pub struct Truck {
    /// Unique identifier (assigned at creation)
    pub id: Uuid,
    /// Owning warehouse, immutable after creation
    pub entrepot_id: Uuid,
    pub immatriculation: String,
    pub transporteur: String,
    pub transfert: String,
    pub cooperative: String,
    /// Analysis codes, set when the manager submits the analysis
    pub kor: Option<String>,
    pub th: Option<String>,
    pub statut: TruckStatus,
    pub advanced_status: Option<AdvancedTruckStatus>,
    pub created_at: DateTime<Utc>,
    pub heure_arrivee: DateTime<Utc>,
    pub refused_at: Option<DateTime<Utc>>,
    pub validated_at: Option<DateTime<Utc>>,
    pub renvoye_at: Option<DateTime<Utc>>,
    pub final_accepted_at: Option<DateTime<Utc>>,
    pub decharge_at: Option<DateTime<Utc>>,
    /// Append-only audit trail, oldest first
    pub history: Vec<HistoryEntry>,
    pub products: Option<TruckProducts>,
    pub unread_for_admin: bool,
    pub unread_for_gerant: bool,
    pub comment: Option<String>,
    /// Optimistic concurrency token, bumped by the repository on update
    pub version: u64,
}

impl Truck {
    /// Register a new truck at the front desk.
    ///
    /// A gate refusal lands directly in `Refoulé`; everything else starts
    /// the workflow in `Enregistré`. Appends the first history entry.
    pub fn register(
        entrepot_id: Uuid,
        registration: TruckRegistration,
        reception: ReceptionStatus,
    ) -> Self {
        let now = Utc::now();
        let (statut, event) = match reception {
            ReceptionStatus::Enregistrer => (TruckStatus::Enregistre, "Camion enregistré"),
            ReceptionStatus::Refouler => (TruckStatus::Refoule, "Camion refoulé à l'arrivée"),
        };

        Self {
            id: Uuid::new_v4(),
            entrepot_id,
            immatriculation: registration.immatriculation,
            transporteur: registration.transporteur,
            transfert: registration.transfert,
            cooperative: registration.cooperative,
            kor: None,
            th: None,
            statut,
            advanced_status: None,
            created_at: now,
            heure_arrivee: now,
            refused_at: None,
            validated_at: None,
            renvoye_at: None,
            final_accepted_at: None,
            decharge_at: None,
            history: vec![HistoryEntry {
                event: event.to_string(),
                by: Actor::Gerant,
                date: now,
            }],
            products: None,
            unread_for_admin: false,
            unread_for_gerant: false,
            comment: None,
            version: 0,
        }
    }

    pub fn push_history(&mut self, event: impl Into<String>, by: Actor, date: DateTime<Utc>) {
        self.history.push(HistoryEntry {
            event: event.into(),
            by,
            date,
        });
    }

    /// Clear the unread flag for the role opening the record.
    /// Idempotent; the other role's flag is untouched.
    pub fn mark_seen(&mut self, role: Actor) {
        match role {
            Actor::Admin => self.unread_for_admin = false,
            Actor::Gerant => self.unread_for_gerant = false,
        }
    }

    /// Human-readable current state, e.g. `Annulé (REFUSE_RENVOYE)`
    pub fn state_label(&self) -> String {
        match self.advanced_status {
            Some(adv) => format!("{} ({})", self.statut, adv),
            None => self.statut.to_string(),
        }
    }
}
