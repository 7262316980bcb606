//! Truck repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Truck;
use crate::domain::DomainResult;

#[async_trait]
pub trait TruckRepository: Send + Sync {
    async fn save(&self, truck: Truck) -> DomainResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Truck>>;
    async fn find_for_warehouse(&self, entrepot_id: Uuid) -> DomainResult<Vec<Truck>>;
    async fn find_all(&self) -> DomainResult<Vec<Truck>>;

    /// Whole-record update with an optimistic concurrency check.
    ///
    /// Fails with `StaleVersion` when the stored version no longer matches
    /// `truck.version`; on success returns the record with the bumped
    /// version.
    async fn update(&self, truck: Truck) -> DomainResult<Truck>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Remove every truck of a warehouse (cascade on warehouse delete).
    /// Returns the number of removed records.
    async fn delete_for_warehouse(&self, entrepot_id: Uuid) -> DomainResult<u64>;
}
