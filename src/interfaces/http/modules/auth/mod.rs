//! Authentication module — login, profile, password change

pub mod dto;
pub mod handlers;

pub use dto::{ChangePasswordRequest, LoginRequest, LoginResponse, UserInfo};
pub use handlers::AuthHandlerState;
