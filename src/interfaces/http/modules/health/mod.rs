//! Health module

pub mod handlers;

pub use handlers::{health_check, ComponentHealth, HealthResponse, HealthState};
