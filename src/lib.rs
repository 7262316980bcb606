//! # Warehouse Reception Service
//!
//! Truck reception tracking backend: front-desk registration, analysis,
//! admin validation/refusal and final acceptance, with per-role
//! notification badges.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, the status workflow engine,
//!   the query layer and repository traits
//! - **application**: Business services orchestrating repositories and
//!   the event bus
//! - **infrastructure**: External concerns (SeaORM database, in-memory
//!   storage, crypto)
//! - **interfaces**: REST API with Swagger documentation + WebSocket
//!   notification stream
//! - **notifications**: Broadcast event bus feeding UI badge updates

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
