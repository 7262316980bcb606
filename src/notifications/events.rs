//! Notification events
//!
//! Defines all event types that can be broadcasted to WebSocket clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Common payload of every truck workflow event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckEventData {
    pub truck_id: Uuid,
    pub entrepot_id: Uuid,
    pub immatriculation: String,
    /// Primary status label after the transition, e.g. "Annulé"
    pub statut: String,
    pub advanced_status: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Warehouse deleted event (cascades its trucks)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseDeletedEvent {
    pub entrepot_id: Uuid,
    pub name: String,
    pub removed_trucks: u64,
    pub timestamp: DateTime<Utc>,
}

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// Truck registered at the front desk
    TruckRegistered(TruckEventData),
    /// Analysis codes submitted by the manager
    AnalysisSubmitted(TruckEventData),
    /// Truck validated by an admin
    TruckValidated(TruckEventData),
    /// Truck refused by an admin
    TruckRefused(TruckEventData),
    /// Refused truck sent back for re-examination
    TruckResent(TruckEventData),
    /// Resent truck put back into the decision queue
    TruckReintegrated(TruckEventData),
    /// Product data recorded, acceptance finalized
    TruckAccepted(TruckEventData),
    /// Unloading finished
    TruckDischarged(TruckEventData),
    /// Warehouse removed together with its trucks
    WarehouseDeleted(WarehouseDeletedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::TruckRegistered(_) => "truck_registered",
            Event::AnalysisSubmitted(_) => "analysis_submitted",
            Event::TruckValidated(_) => "truck_validated",
            Event::TruckRefused(_) => "truck_refused",
            Event::TruckResent(_) => "truck_resent",
            Event::TruckReintegrated(_) => "truck_reintegrated",
            Event::TruckAccepted(_) => "truck_accepted",
            Event::TruckDischarged(_) => "truck_discharged",
            Event::WarehouseDeleted(_) => "warehouse_deleted",
        }
    }

    /// Warehouse the event belongs to
    pub fn entrepot_id(&self) -> Uuid {
        match self {
            Event::TruckRegistered(e)
            | Event::AnalysisSubmitted(e)
            | Event::TruckValidated(e)
            | Event::TruckRefused(e)
            | Event::TruckResent(e)
            | Event::TruckReintegrated(e)
            | Event::TruckAccepted(e)
            | Event::TruckDischarged(e) => e.entrepot_id,
            Event::WarehouseDeleted(e) => e.entrepot_id,
        }
    }
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
