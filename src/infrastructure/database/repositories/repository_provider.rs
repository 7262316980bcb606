//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::truck::TruckRepository;
use crate::domain::user::UserRepository;
use crate::domain::warehouse::WarehouseRepository;

use super::truck_repository::SeaOrmTruckRepository;
use super::user_repository::SeaOrmUserRepository;
use super::warehouse_repository::SeaOrmWarehouseRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository
/// accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let truck = repos.trucks().find_by_id(id).await?;
/// let warehouses = repos.warehouses().find_all().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    trucks: SeaOrmTruckRepository,
    warehouses: SeaOrmWarehouseRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            trucks: SeaOrmTruckRepository::new(db.clone()),
            warehouses: SeaOrmWarehouseRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn trucks(&self) -> &dyn TruckRepository {
        &self.trucks
    }

    fn warehouses(&self) -> &dyn WarehouseRepository {
        &self.warehouses
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
