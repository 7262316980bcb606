//! Warehouse repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Warehouse;
use crate::domain::DomainResult;

#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    async fn save(&self, warehouse: Warehouse) -> DomainResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Warehouse>>;
    async fn find_all(&self) -> DomainResult<Vec<Warehouse>>;
    async fn update(&self, warehouse: Warehouse) -> DomainResult<()>;
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
