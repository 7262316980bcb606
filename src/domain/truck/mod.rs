//! Truck aggregate: entity, workflow engine, query layer, repository

pub mod model;
pub mod query;
pub mod repository;
pub mod workflow;

pub use model::{
    Actor, AdvancedTruckStatus, HistoryEntry, ReceptionStatus, Truck, TruckProducts,
    TruckRegistration, TruckStatus,
};
pub use query::{PeriodFilter, TruckOrder, TruckQuery, TruckTab, WarehouseTruckStats};
pub use repository::TruckRepository;
pub use workflow::{apply, TruckAction};
