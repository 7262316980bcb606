//! Warehouse endpoints: CRUD, stats, truck registration

pub mod dto;
pub mod handlers;

pub use dto::{CreateWarehouseRequest, UpdateWarehouseRequest, WarehouseDto, WarehouseStatsDto};
pub use handlers::WarehouseHandlerState;
