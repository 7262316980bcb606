//! Users module — user management (admin CRUD)

pub mod dto;
pub mod handlers;

pub use dto::{CreateUserRequest, UpdateUserRequest, UserDto};
pub use handlers::UserHandlerState;
