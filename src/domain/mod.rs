//! Core business entities, the workflow engine and repository traits

pub mod error;
pub mod repositories;
pub mod truck;
pub mod user;
pub mod warehouse;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
pub use truck::{
    Actor, AdvancedTruckStatus, HistoryEntry, PeriodFilter, ReceptionStatus, Truck, TruckAction,
    TruckOrder, TruckProducts, TruckQuery, TruckRegistration, TruckRepository, TruckStatus,
    TruckTab, WarehouseTruckStats,
};
pub use user::{User, UserRepository, UserRole, UserStatus};
pub use warehouse::{Warehouse, WarehouseRepository};
