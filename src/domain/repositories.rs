//! Repository provider
//!
//! One object owning all per-aggregate repositories, so services depend on
//! a single `Arc<dyn RepositoryProvider>` instead of an ambient store.

use crate::domain::truck::TruckRepository;
use crate::domain::user::UserRepository;
use crate::domain::warehouse::WarehouseRepository;

pub trait RepositoryProvider: Send + Sync {
    fn trucks(&self) -> &dyn TruckRepository;
    fn warehouses(&self) -> &dyn WarehouseRepository;
    fn users(&self) -> &dyn UserRepository;
}
