//! HTTP REST API interfaces
//!
//! - `middleware`: Authentication middleware (JWT)
//! - `common`: Response envelope, pagination, validated JSON extractor
//! - `modules`: Request handlers for all resources
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
