//! Warehouse business logic service

use std::sync::Arc;

use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Warehouse, WarehouseTruckStats,
};
use crate::notifications::{Event, SharedEventBus, WarehouseDeletedEvent};

/// Service for warehouse CRUD and per-warehouse statistics
pub struct WarehouseService {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: SharedEventBus,
}

impl WarehouseService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, event_bus: SharedEventBus) -> Self {
        Self { repos, event_bus }
    }

    pub async fn create(
        &self,
        name: &str,
        location: &str,
        image_url: Option<String>,
    ) -> DomainResult<Warehouse> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("name is required".to_string()));
        }

        let mut warehouse = Warehouse::new(name, location.trim());
        warehouse.image_url = image_url;
        self.repos.warehouses().save(warehouse.clone()).await?;

        info!("Warehouse created: {} ({})", warehouse.name, warehouse.id);
        Ok(warehouse)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Warehouse> {
        self.repos
            .warehouses()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Warehouse",
                field: "id",
                value: id.to_string(),
            })
    }

    pub async fn list(&self) -> DomainResult<Vec<Warehouse>> {
        self.repos.warehouses().find_all().await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        location: Option<String>,
        image_url: Option<String>,
    ) -> DomainResult<Warehouse> {
        let mut warehouse = self.get(id).await?;

        if let Some(name) = name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::Validation("name cannot be empty".to_string()));
            }
            warehouse.name = name;
        }
        if let Some(location) = location {
            warehouse.location = location.trim().to_string();
        }
        if let Some(image_url) = image_url {
            warehouse.image_url = Some(image_url);
        }

        self.repos.warehouses().update(warehouse.clone()).await?;
        Ok(warehouse)
    }

    /// Delete a warehouse and cascade-remove its trucks.
    pub async fn delete(&self, id: Uuid) -> DomainResult<u64> {
        let warehouse = self.get(id).await?;

        // trucks first so a failure never leaves orphans behind a missing
        // warehouse
        let removed = self.repos.trucks().delete_for_warehouse(id).await?;
        self.repos.warehouses().delete(id).await?;

        info!(
            "Warehouse {} deleted, {} trucks removed",
            warehouse.name, removed
        );
        self.event_bus
            .publish(Event::WarehouseDeleted(WarehouseDeletedEvent {
                entrepot_id: id,
                name: warehouse.name,
                removed_trucks: removed,
                timestamp: Utc::now(),
            }));

        Ok(removed)
    }

    /// Dashboard counters for one warehouse.
    pub async fn stats(&self, id: Uuid) -> DomainResult<WarehouseTruckStats> {
        // 404 on unknown warehouses rather than an all-zero answer
        self.get(id).await?;
        let trucks = self.repos.trucks().find_for_warehouse(id).await?;
        Ok(WarehouseTruckStats::compute(&trucks))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::ReceptionService;
    use crate::domain::{ReceptionStatus, TruckRegistration};
    use crate::infrastructure::storage::InMemoryRepositories;
    use crate::notifications::create_event_bus;

    fn services() -> (WarehouseService, ReceptionService, Arc<dyn RepositoryProvider>) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositories::new());
        let bus = create_event_bus();
        (
            WarehouseService::new(repos.clone(), bus.clone()),
            ReceptionService::new(repos.clone(), bus),
            repos,
        )
    }

    fn registration(immatriculation: &str) -> TruckRegistration {
        TruckRegistration {
            immatriculation: immatriculation.to_string(),
            transporteur: "Acme".to_string(),
            transfert: String::new(),
            cooperative: String::new(),
        }
    }

    #[tokio::test]
    async fn delete_cascades_trucks() {
        let (warehouses, reception, repos) = services();

        let kept = warehouses.create("Entrepôt Nord", "Lille", None).await.unwrap();
        let doomed = warehouses.create("Entrepôt Sud", "Lyon", None).await.unwrap();

        reception
            .register_truck(doomed.id, registration("AA-111-AA"), ReceptionStatus::Enregistrer)
            .await
            .unwrap();
        reception
            .register_truck(doomed.id, registration("BB-222-BB"), ReceptionStatus::Enregistrer)
            .await
            .unwrap();
        reception
            .register_truck(kept.id, registration("CC-333-CC"), ReceptionStatus::Enregistrer)
            .await
            .unwrap();

        let removed = warehouses.delete(doomed.id).await.unwrap();
        assert_eq!(removed, 2);

        let remaining = repos.trucks().find_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|t| t.entrepot_id == kept.id));
    }

    #[tokio::test]
    async fn delete_unknown_warehouse_is_not_found() {
        let (warehouses, _, _) = services();
        let err = warehouses.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn stats_reflect_truck_states() {
        let (warehouses, reception, _) = services();
        let warehouse = warehouses.create("Entrepôt Sud", "Lyon", None).await.unwrap();

        reception
            .register_truck(
                warehouse.id,
                registration("AA-111-AA"),
                ReceptionStatus::Enregistrer,
            )
            .await
            .unwrap();
        reception
            .register_truck(
                warehouse.id,
                registration("BB-222-BB"),
                ReceptionStatus::Refouler,
            )
            .await
            .unwrap();

        let stats = warehouses.stats(warehouse.id).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.enregistres, 1);
        assert_eq!(stats.refoules, 1);
    }
}
