//! Truck reception business logic service

use std::sync::Arc;

use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::domain::truck::workflow;
use crate::domain::{
    Actor, DomainError, DomainResult, ReceptionStatus, RepositoryProvider, Truck, TruckAction,
    TruckQuery, TruckRegistration,
};
use crate::notifications::{Event, SharedEventBus, TruckEventData};

/// Service driving the truck reception workflow.
///
/// Every mutation goes through the same shape: load the record, apply the
/// change on a copy, persist the whole record, then publish the matching
/// event. A failed persist therefore never leaves a half-applied
/// transition visible.
pub struct ReceptionService {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: SharedEventBus,
}

impl ReceptionService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, event_bus: SharedEventBus) -> Self {
        Self { repos, event_bus }
    }

    fn event_data(truck: &Truck) -> TruckEventData {
        TruckEventData {
            truck_id: truck.id,
            entrepot_id: truck.entrepot_id,
            immatriculation: truck.immatriculation.clone(),
            statut: truck.statut.to_string(),
            advanced_status: truck.advanced_status.map(|a| a.to_string()),
            timestamp: Utc::now(),
        }
    }

    /// Register a truck showing up at the gate of a warehouse.
    pub async fn register_truck(
        &self,
        entrepot_id: Uuid,
        mut registration: TruckRegistration,
        reception: ReceptionStatus,
    ) -> DomainResult<Truck> {
        registration.immatriculation = registration.immatriculation.trim().to_string();
        registration.transporteur = registration.transporteur.trim().to_string();
        registration.transfert = registration.transfert.trim().to_string();
        registration.cooperative = registration.cooperative.trim().to_string();

        if registration.immatriculation.is_empty() {
            return Err(DomainError::Validation(
                "immatriculation is required".to_string(),
            ));
        }

        // orphaned trucks are not allowed, the warehouse must exist
        if self
            .repos
            .warehouses()
            .find_by_id(entrepot_id)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound {
                entity: "Warehouse",
                field: "id",
                value: entrepot_id.to_string(),
            });
        }

        let truck = Truck::register(entrepot_id, registration, reception);
        self.repos.trucks().save(truck.clone()).await?;

        metrics::counter!("reception_trucks_registered_total").increment(1);
        info!(
            "Truck registered: {} ({}) at warehouse {}",
            truck.immatriculation, truck.statut, entrepot_id
        );

        self.event_bus
            .publish(Event::TruckRegistered(Self::event_data(&truck)));
        Ok(truck)
    }

    /// Apply a workflow action to a truck and persist the result.
    pub async fn apply_action(&self, truck_id: Uuid, action: TruckAction) -> DomainResult<Truck> {
        let mut truck = self
            .repos
            .trucks()
            .find_by_id(truck_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Truck",
                field: "id",
                value: truck_id.to_string(),
            })?;

        let action_name = action.name();
        workflow::apply(&mut truck, action.clone())?;
        let truck = self.repos.trucks().update(truck).await?;

        metrics::counter!("reception_workflow_actions_total", "action" => action_name)
            .increment(1);
        info!(
            "Workflow action {} applied to truck {}: now {}",
            action_name,
            truck.immatriculation,
            truck.state_label()
        );

        let data = Self::event_data(&truck);
        let event = match action {
            TruckAction::SubmitAnalysis { .. } => Event::AnalysisSubmitted(data),
            TruckAction::Validate => Event::TruckValidated(data),
            TruckAction::Refuse { .. } => Event::TruckRefused(data),
            TruckAction::Resend => Event::TruckResent(data),
            TruckAction::Reintegrate => Event::TruckReintegrated(data),
            TruckAction::AcceptFinal { .. } => Event::TruckAccepted(data),
            TruckAction::MarkDischarged => Event::TruckDischarged(data),
        };
        self.event_bus.publish(event);

        Ok(truck)
    }

    /// Clear the unread flag of `role` on a truck (detail view opened).
    pub async fn mark_seen(&self, truck_id: Uuid, role: Actor) -> DomainResult<Truck> {
        let mut truck = self
            .repos
            .trucks()
            .find_by_id(truck_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Truck",
                field: "id",
                value: truck_id.to_string(),
            })?;

        truck.mark_seen(role);
        self.repos.trucks().update(truck).await
    }

    pub async fn get_truck(&self, truck_id: Uuid) -> DomainResult<Truck> {
        self.repos
            .trucks()
            .find_by_id(truck_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Truck",
                field: "id",
                value: truck_id.to_string(),
            })
    }

    /// Filtered view of one warehouse's trucks.
    pub async fn list_for_warehouse(
        &self,
        entrepot_id: Uuid,
        query: &TruckQuery,
    ) -> DomainResult<Vec<Truck>> {
        let trucks = self.repos.trucks().find_for_warehouse(entrepot_id).await?;
        Ok(query.apply(trucks))
    }

    /// Cross-warehouse view (history screens); `entrepot_id` narrows it.
    pub async fn list_trucks(
        &self,
        entrepot_id: Option<Uuid>,
        query: &TruckQuery,
    ) -> DomainResult<Vec<Truck>> {
        let trucks = match entrepot_id {
            Some(id) => self.repos.trucks().find_for_warehouse(id).await?,
            None => self.repos.trucks().find_all().await?,
        };
        Ok(query.apply(trucks))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdvancedTruckStatus, TruckStatus, Warehouse};
    use crate::infrastructure::storage::InMemoryRepositories;
    use crate::notifications::create_event_bus;

    async fn service_with_warehouse() -> (ReceptionService, Uuid) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositories::new());
        let warehouse = Warehouse::new("Entrepôt Lyon Sud", "Corbas, Auvergne-Rhône-Alpes");
        let entrepot_id = warehouse.id;
        repos.warehouses().save(warehouse).await.unwrap();
        (ReceptionService::new(repos, create_event_bus()), entrepot_id)
    }

    fn registration() -> TruckRegistration {
        TruckRegistration {
            immatriculation: "AB-123-CD".to_string(),
            transporteur: "Acme".to_string(),
            transfert: String::new(),
            cooperative: String::new(),
        }
    }

    #[tokio::test]
    async fn register_then_refuse_scenario() {
        let (service, entrepot_id) = service_with_warehouse().await;

        let truck = service
            .register_truck(entrepot_id, registration(), ReceptionStatus::Enregistrer)
            .await
            .unwrap();
        assert_eq!(truck.statut, TruckStatus::Enregistre);
        assert_eq!(truck.history.len(), 1);
        assert_eq!(truck.history[0].event, "Camion enregistré");

        let truck = service
            .apply_action(
                truck.id,
                TruckAction::SubmitAnalysis {
                    kor: "K1".to_string(),
                    th: "T1".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(truck.statut, TruckStatus::EnAttente);
        assert_eq!(truck.history.len(), 2);

        let truck = service
            .apply_action(truck.id, TruckAction::Refuse { comment: None })
            .await
            .unwrap();
        assert_eq!(truck.statut, TruckStatus::Annule);
        assert_eq!(
            truck.advanced_status,
            Some(AdvancedTruckStatus::RefuseEnAttenteGerant)
        );
        assert!(truck.unread_for_gerant);
        assert_eq!(truck.history.len(), 3);
    }

    #[tokio::test]
    async fn register_requires_existing_warehouse() {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositories::new());
        let service = ReceptionService::new(repos, create_event_bus());

        let err = service
            .register_truck(Uuid::new_v4(), registration(), ReceptionStatus::Enregistrer)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn register_requires_immatriculation() {
        let (service, entrepot_id) = service_with_warehouse().await;

        let err = service
            .register_truck(
                entrepot_id,
                TruckRegistration {
                    immatriculation: "   ".to_string(),
                    ..TruckRegistration::default()
                },
                ReceptionStatus::Enregistrer,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn invalid_action_leaves_record_untouched() {
        let (service, entrepot_id) = service_with_warehouse().await;
        let truck = service
            .register_truck(entrepot_id, registration(), ReceptionStatus::Enregistrer)
            .await
            .unwrap();

        let err = service
            .apply_action(truck.id, TruckAction::Validate)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        let stored = service.get_truck(truck.id).await.unwrap();
        assert_eq!(stored.statut, TruckStatus::Enregistre);
        assert_eq!(stored.history.len(), 1);
    }

    #[tokio::test]
    async fn mark_seen_persists_flag_clear() {
        let (service, entrepot_id) = service_with_warehouse().await;
        let truck = service
            .register_truck(entrepot_id, registration(), ReceptionStatus::Enregistrer)
            .await
            .unwrap();
        service
            .apply_action(
                truck.id,
                TruckAction::SubmitAnalysis {
                    kor: "K1".to_string(),
                    th: "T1".to_string(),
                },
            )
            .await
            .unwrap();
        service
            .apply_action(truck.id, TruckAction::Validate)
            .await
            .unwrap();

        let seen = service.mark_seen(truck.id, Actor::Gerant).await.unwrap();
        assert!(!seen.unread_for_gerant);

        let stored = service.get_truck(truck.id).await.unwrap();
        assert!(!stored.unread_for_gerant);
    }

    #[tokio::test]
    async fn workflow_events_reach_subscribers() {
        let (service, entrepot_id) = service_with_warehouse().await;
        let mut subscriber = service.event_bus.subscribe();

        service
            .register_truck(entrepot_id, registration(), ReceptionStatus::Enregistrer)
            .await
            .unwrap();

        let received = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            subscriber.recv(),
        )
        .await
        .expect("Timeout")
        .expect("No message");
        assert_eq!(received.event.event_type(), "truck_registered");
        assert_eq!(received.event.entrepot_id(), entrepot_id);
    }
}
