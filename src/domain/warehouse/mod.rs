//! Warehouse aggregate

pub mod model;
pub mod repository;

pub use model::Warehouse;
pub use repository::WarehouseRepository;
